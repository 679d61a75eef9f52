pub mod assets;
pub mod input;
pub mod picking;
pub mod renderer;
pub mod theme;
pub mod window;

pub use assets::{FileThemeLoader, HelpDisplay, SoundPlayer, ThemeLoader};
pub use picking::{effective_clip, hit_test};
pub use renderer::{render, Renderer};
