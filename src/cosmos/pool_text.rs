use crate::{Deactivator, PoolEntity, Prototype};
use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Opaque white, the color every recycled text starts with.
pub const WHITE: Vec4 = Vec4::ONE;

/// Template for floating score texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolTextPrototype {
    /// Seconds the text stays on screen.
    pub lifespan: f32,
    /// Survives context teardown.
    pub persistent: bool,
}

impl Default for PoolTextPrototype {
    fn default() -> Self {
        PoolTextPrototype {
            lifespan: 1.0,
            persistent: false,
        }
    }
}

impl Prototype<PoolText> for PoolTextPrototype {
    fn instantiate(&self, deactivator: Deactivator) -> PoolText {
        PoolText {
            lifespan: self.lifespan,
            persistent: self.persistent,
            screen_position: Vec2::ZERO,
            text: String::new(),
            color: WHITE,
            time: 0.0,
            deactivator,
        }
    }
}

/// A pooled floating text, positioned in screen space.
#[derive(Debug)]
pub struct PoolText {
    lifespan: f32,
    persistent: bool,
    screen_position: Vec2,
    text: String,
    color: Vec4,
    time: f32,
    deactivator: Deactivator,
}

impl PoolText {
    /// Advances the display timer, asking to be deactivated once expired.
    pub fn tick(&mut self, dt: f32) {
        self.time += dt;
        if self.time >= self.lifespan {
            self.deactivator.deactivate();
        }
    }

    /// Screen position.
    pub fn screen_position(&self) -> Vec2 {
        self.screen_position
    }

    /// Displayed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the displayed text, reusing the buffer.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    /// Text color.
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Sets the text color.
    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }
}

impl PoolEntity for PoolText {
    type SpawnParams = Vec2;

    fn place(&mut self, screen_position: Vec2) {
        self.screen_position = screen_position;
    }

    fn on_object_reset(&mut self) {
        self.text.clear();
        self.color = WHITE;
        self.time = 0.0;
    }

    fn dont_destroy_on_load(&self) -> bool {
        self.persistent
    }
}
