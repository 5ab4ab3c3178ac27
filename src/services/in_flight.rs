//! In-Flight Guards
//!
//! One flag per generation class. Starting an action of a class that is
//! already running is rejected; the flag is released when the guard drops,
//! whichever way the action ends.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClass {
    DrawingGeneration,
    MaterialsGeneration,
}

impl ActionClass {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DrawingGeneration => "drawing generation",
            Self::MaterialsGeneration => "materials generation",
        }
    }
}

#[derive(Debug, Default)]
pub struct InFlight {
    drawings: AtomicBool,
    materials: AtomicBool,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, class: ActionClass) -> &AtomicBool {
        match class {
            ActionClass::DrawingGeneration => &self.drawings,
            ActionClass::MaterialsGeneration => &self.materials,
        }
    }

    /// Mark `class` as running, or fail with `Busy` if it already is.
    pub fn try_begin(&self, class: ActionClass) -> AppResult<InFlightGuard<'_>> {
        let flag = self.flag(class);
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::Busy(class.label().to_string()))?;
        Ok(InFlightGuard { flag })
    }

    pub fn is_active(&self, class: ActionClass) -> bool {
        self.flag(class).load(Ordering::Acquire)
    }
}

/// Clears its flag on drop
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
