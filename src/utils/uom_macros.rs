#![warn(missing_docs)]
//! Macros for the concise creation of uom unit values

/// Create a `Length` in meter
#[macro_export]
macro_rules! meter {
    ($val:expr) => {{
        use uom::si::{f64::Length, length::meter};
        Length::new::<meter>($val)
    }};
}
/// Create a `Length` in centimeter
#[macro_export]
macro_rules! centimeter {
    ($val:expr) => {{
        use uom::si::{f64::Length, length::centimeter};
        Length::new::<centimeter>($val)
    }};
}
/// Create a `Length` in millimeter
#[macro_export]
macro_rules! millimeter {
    ($val:expr) => {{
        use uom::si::{f64::Length, length::millimeter};
        Length::new::<millimeter>($val)
    }};
}
