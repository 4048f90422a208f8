#![forbid(unsafe_code)]

//! View-model composition: the Inputs/Outputs/Errors idiom, the debounced
//! selection machine, and two worked examples.
//!
//! A view-model owns one signal graph built at construction from an
//! explicit [`Environment`](brook_env::Environment): state cells back the
//! inputs, operators derive the outputs, and collaborator failures surface
//! only on the errors group as resolved strings. See [`FeedViewModel`] for
//! the focus-and-play flow and [`CommentComposerViewModel`] for the
//! draft-and-post flow.

pub mod comment_composer;
pub mod feed;
pub mod selection;
pub mod viewmodel;

pub use comment_composer::{
    CommentComposerErrors, CommentComposerInputs, CommentComposerOutputs, CommentComposerViewModel,
};
pub use feed::{FeedErrors, FeedInputs, FeedOutputs, FeedViewModel, IMPORTANCE_DECAY, NowPlaying};
pub use selection::DebouncedSelection;
pub use viewmodel::ViewModel;
