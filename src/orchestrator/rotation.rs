//! Scoped page mutations for rotated-text passes.

use std::ops::{Deref, DerefMut};

use crate::engine::ContentStreamEngine;
use crate::error::Result;
use crate::model::Matrix;

/// Sets a page's rotation to 0 and restores the original value on drop.
pub struct PageRotationGuard<'a> {
    engine: &'a mut dyn ContentStreamEngine,
    page: u32,
    original: u16,
}

impl<'a> PageRotationGuard<'a> {
    pub fn new(engine: &'a mut dyn ContentStreamEngine, page: u32) -> Result<Self> {
        let original = engine.page_info(page)?.rotation;
        engine.set_page_rotation(page, 0)?;
        Ok(Self {
            engine,
            page,
            original,
        })
    }

    pub fn original_rotation(&self) -> u16 {
        self.original
    }
}

impl<'a> Deref for PageRotationGuard<'a> {
    type Target = dyn ContentStreamEngine + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.engine
    }
}

impl DerefMut for PageRotationGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.engine
    }
}

impl Drop for PageRotationGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.engine.set_page_rotation(self.page, self.original) {
            log::warn!("Failed to restore rotation of page {}: {}", self.page, e);
        }
    }
}

/// Prepends `rotate(-angle)` to the page content until dropped.
pub struct RotationGuard<'a> {
    engine: &'a mut dyn ContentStreamEngine,
    page: u32,
}

impl<'a> RotationGuard<'a> {
    pub fn new(engine: &'a mut dyn ContentStreamEngine, page: u32, angle: i32) -> Result<Self> {
        let counter_rotation = Matrix::rotation((-angle as f32).to_radians());
        engine.prepend_transform(page, counter_rotation)?;
        Ok(Self { engine, page })
    }
}

impl<'a> Deref for RotationGuard<'a> {
    type Target = dyn ContentStreamEngine + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.engine
    }
}

impl DerefMut for RotationGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.engine
    }
}

impl Drop for RotationGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.engine.remove_prepended_transform(self.page) {
            log::warn!("Failed to remove transform from page {}: {}", self.page, e);
        }
    }
}
