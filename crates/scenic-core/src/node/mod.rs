use crate::animation::EasingType;

pub mod group;
pub use group::GroupNode;

// Helper to parse easing
pub fn parse_easing(e: &str) -> EasingType {
    match e {
        "linear" => EasingType::Linear,
        "ease_in" | "easeIn" => EasingType::EaseIn,
        "ease_out" | "easeOut" => EasingType::EaseOut,
        "ease_in_out" | "easeInOut" => EasingType::EaseInOut,
        _ => EasingType::Linear,
    }
}
