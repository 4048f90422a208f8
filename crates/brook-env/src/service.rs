#![forbid(unsafe_code)]

//! The network-facing capability consumed by view-models.
//!
//! Every operation returns a cold [`Source`]: nothing happens until the
//! caller starts it, each start observes the full response, and a
//! superseding start cancels the previous one structurally (the switch
//! operators drop the old subscription). The engine never implements this
//! trait against a real transport; hosts and the test harness do.

use brook_core::Source;

use crate::envelope::ErrorEnvelope;
use crate::models::{Comment, CommentTarget, Playlist, Project};

/// Remote operations the worked-example view-models need.
pub trait Service {
    /// The browsable playlists for the feed.
    fn playlists(&self) -> Source<Vec<Playlist>, ErrorEnvelope>;

    /// The currently featured project of a playlist.
    fn project_for(&self, playlist: &Playlist) -> Source<Project, ErrorEnvelope>;

    /// Post a comment on the target, echoing the created comment back.
    fn post_comment(&self, body: &str, target: &CommentTarget) -> Source<Comment, ErrorEnvelope>;
}
