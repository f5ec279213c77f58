//! Demo value type: an employee ranked by priority

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: u64,
    pub priority: u32,
}

impl Employee {
    pub fn new(id: u64, priority: u32) -> Self {
        Self { id, priority }
    }

    /// Priority extractor handed to the eviction policy
    pub fn priority_of(employee: &Employee) -> u32 {
        employee.priority
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Employee [id={}, priority={}]", self.id, self.priority)
    }
}
