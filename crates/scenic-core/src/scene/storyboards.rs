//! Storyboard operations of [`SceneNode`].

use super::SceneNode;
use crate::storyboard::{Storyboard, StoryboardAnimator, StoryboardState};
use scenic_theme::ThemeElement;
use std::sync::Arc;
use tracing::debug;

impl SceneNode {
    /// Compiles the storyboard `name` declared by `element` and registers it.
    ///
    /// Re-applying identical content is a no-op. Replacing the storyboard that
    /// is currently selected deselects it first, restoring its snapshot.
    /// Returns `false` if the element declares no such storyboard.
    pub fn apply_storyboard(&mut self, element: &ThemeElement, name: &str) -> bool {
        let Some(def) = element.storyboards.get(name) else {
            debug!(storyboard = name, "theme element declares no such storyboard");
            return false;
        };
        if self
            .storyboards
            .registry
            .get(name)
            .is_some_and(|existing| existing.source() == def)
        {
            return true;
        }

        let storyboard = Storyboard::compile(name, def, |property| self.is_known_property(property));
        self.register_storyboard(Arc::new(storyboard));
        true
    }

    /// Registers an already compiled storyboard, possibly shared with other nodes.
    pub fn register_storyboard(&mut self, storyboard: Arc<Storyboard>) {
        if self.selected_storyboard() == Some(storyboard.name()) {
            self.deselect_storyboard(true);
        }
        self.storyboards
            .registry
            .insert(storyboard.name().to_string(), storyboard);
    }

    /// Selects a registered storyboard and snapshots the properties it drives.
    ///
    /// Re-selecting the current one succeeds without effect. Selecting a
    /// different one while the current one has already applied values fails:
    /// callers must deselect first.
    pub fn select_storyboard(&mut self, name: &str) -> bool {
        let Some(storyboard) = self.storyboards.registry.get(name).cloned() else {
            return false;
        };

        if let Some(current) = &self.storyboards.current {
            if current.name() == name {
                return true;
            }
            if current.is_modified() {
                debug!(
                    selected = current.name(),
                    requested = name,
                    "another storyboard has applied values; deselect it first"
                );
                return false;
            }
            self.deselect_storyboard(true);
        }

        let animator =
            StoryboardAnimator::new(storyboard, &self.state.bindings, |p| self.get_property(p))
                .with_z_override(self.state.z_index);
        self.storyboards.current = Some(animator);
        true
    }

    /// Leaves the selection. With `restore`, every snapshotted property is
    /// written back through its setter.
    pub fn deselect_storyboard(&mut self, restore: bool) -> bool {
        let Some(animator) = self.storyboards.current.take() else {
            return false;
        };
        if restore {
            for (property, value) in animator.snapshot() {
                if property == "zIndex" && animator.z_override().is_none() {
                    self.clear_z_index();
                } else {
                    self.set_property(property, value);
                }
            }
        }
        true
    }

    /// Starts or resumes the selected storyboard.
    pub fn start_storyboard(&mut self) -> bool {
        let Some(animator) = self.storyboards.current.as_mut() else {
            return false;
        };
        if animator.start() {
            if let Some(sound) = animator.storyboard().sound() {
                self.pending_sounds.push(sound.to_string());
            }
        }
        true
    }

    pub fn pause_storyboard(&mut self) -> bool {
        match self.storyboards.current.as_mut() {
            Some(animator) => {
                animator.pause();
                true
            }
            None => false,
        }
    }

    /// Rewinds the selected storyboard to zero, keeping it selected.
    pub fn stop_storyboard(&mut self) -> bool {
        match self.storyboards.current.as_mut() {
            Some(animator) => {
                animator.stop();
                true
            }
            None => false,
        }
    }

    /// Includes or excludes a property from storyboard control on this node.
    ///
    /// An excluded property can be driven by a direct animation without the
    /// storyboard overwriting it every tick.
    pub fn enable_storyboard_property(&mut self, property: &str, enable: bool) {
        if enable {
            self.storyboards.disabled.remove(property);
        } else {
            self.storyboards.disabled.insert(property.to_string());
        }
    }

    /// With an empty `name` and `compare_empty == false`, whether any storyboard is registered.
    pub fn has_storyboard(&self, name: &str, compare_empty: bool) -> bool {
        if name.is_empty() && !compare_empty {
            return !self.storyboards.is_empty();
        }
        self.storyboards.registry.contains_key(name)
    }

    /// Whether storyboard `name` exists and, if `property` is non-empty, drives it.
    pub fn storyboard_exists(&self, name: &str, property: &str) -> bool {
        self.storyboards
            .get(name)
            .is_some_and(|sb| property.is_empty() || sb.has_property(property))
    }

    pub fn current_storyboard_has_property(&self, property: &str) -> bool {
        self.storyboards
            .current()
            .is_some_and(|animator| animator.has_property(property))
    }

    /// Whether a storyboard (named `name`, or any when empty) is playing.
    pub fn is_storyboard_running(&self, name: &str) -> bool {
        self.storyboards.current().is_some_and(|animator| {
            animator.state() == StoryboardState::Playing && (name.is_empty() || animator.name() == name)
        })
    }

    pub fn storyboard_state(&self) -> StoryboardState {
        self.storyboards
            .current()
            .map_or(StoryboardState::Stopped, StoryboardAnimator::state)
    }

    pub fn selected_storyboard(&self) -> Option<&str> {
        self.storyboards.current().map(StoryboardAnimator::name)
    }

    /// Per-tick storyboard update: applies the values of enabled tracks through the setters.
    pub(crate) fn update_storyboard(&mut self, dt: f64) {
        let Some(mut animator) = self.storyboards.current.take() else {
            return;
        };

        let mut values = Vec::new();
        let looped = animator.advance(dt, &self.storyboards.disabled, &mut values);
        for (property, value) in &values {
            self.set_property(property, value);
        }
        if looped {
            if let Some(sound) = animator.storyboard().sound() {
                self.pending_sounds.push(sound.to_string());
            }
        }

        self.storyboards.current = Some(animator);
    }
}
