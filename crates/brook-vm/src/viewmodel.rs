#![forbid(unsafe_code)]

//! The Inputs/Outputs/Errors view-model idiom.
//!
//! A view-model is one concrete type implementing three narrow trait
//! groups: inputs the UI may drive, output signals the UI renders from, and
//! the error signals it presents. State cells back the inputs but are never
//! exposed; callers see only the trait surfaces through
//! [`inputs`](ViewModel::inputs) / [`outputs`](ViewModel::outputs) /
//! [`errors`](ViewModel::errors).

/// Marker connecting a view-model type to its three trait groups.
pub trait ViewModel {
    type Inputs: ?Sized;
    type Outputs: ?Sized;
    type Errors: ?Sized;

    fn inputs(&self) -> &Self::Inputs;
    fn outputs(&self) -> &Self::Outputs;
    fn errors(&self) -> &Self::Errors;
}
