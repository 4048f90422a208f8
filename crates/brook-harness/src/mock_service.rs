#![forbid(unsafe_code)]

//! Canned, injectable [`Service`] implementation.
//!
//! Responses are synchronous: each start delivers its canned value (or the
//! injected failure) immediately. Time-dependent behavior belongs to the
//! scheduler, not the mock.

use std::cell::RefCell;
use std::rc::Rc;

use brook_core::Source;
use brook_env::{Comment, CommentTarget, ErrorEnvelope, Playlist, Project, Service};

/// In-memory service with canned fixtures and injectable failures.
pub struct MockService {
    playlists: Vec<Playlist>,
    projects: Vec<(u64, Project)>,
    playlists_error: Option<ErrorEnvelope>,
    project_error: Option<ErrorEnvelope>,
    post_comment_error: Option<ErrorEnvelope>,
    posted: Rc<RefCell<Vec<(String, CommentTarget)>>>,
    next_comment_id: Rc<RefCell<u64>>,
}

impl Default for MockService {
    fn default() -> Self {
        // Fixtures ride through serde so the mock exercises the same wire
        // shapes a real transport would produce.
        let fixtures = serde_json::json!({
            "playlists": [
                { "id": 1, "name": "Featured" },
                { "id": 2, "name": "Art" },
                { "id": 3, "name": "Games" }
            ],
            "projects": [
                [1, { "id": 101, "name": "Cosmic Quilt",
                      "video_url": "https://videos.example/cosmic-quilt.mp4" }],
                [2, { "id": 102, "name": "Paper Orrery",
                      "video_url": "https://videos.example/paper-orrery.mp4" }],
                [3, { "id": 103, "name": "Night Harbor",
                      "video_url": "https://videos.example/night-harbor.mp4" }]
            ]
        });
        let playlists =
            serde_json::from_value(fixtures["playlists"].clone()).expect("playlist fixtures");
        let projects =
            serde_json::from_value(fixtures["projects"].clone()).expect("project fixtures");
        Self {
            playlists,
            projects,
            playlists_error: None,
            project_error: None,
            post_comment_error: None,
            posted: Rc::new(RefCell::new(Vec::new())),
            next_comment_id: Rc::new(RefCell::new(1)),
        }
    }
}

impl MockService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_playlists(mut self, playlists: Vec<Playlist>) -> Self {
        self.playlists = playlists;
        self
    }

    /// Make `playlists()` fail.
    #[must_use]
    pub fn failing_playlists(mut self, envelope: ErrorEnvelope) -> Self {
        self.playlists_error = Some(envelope);
        self
    }

    /// Make `project_for()` fail for every playlist.
    #[must_use]
    pub fn failing_projects(mut self, envelope: ErrorEnvelope) -> Self {
        self.project_error = Some(envelope);
        self
    }

    /// Make `post_comment()` fail.
    #[must_use]
    pub fn failing_post_comment(mut self, envelope: ErrorEnvelope) -> Self {
        self.post_comment_error = Some(envelope);
        self
    }

    /// The canned playlist fixtures, for test expectations.
    #[must_use]
    pub fn canned_playlists(&self) -> Vec<Playlist> {
        self.playlists.clone()
    }

    /// The canned project for a playlist, for test expectations.
    #[must_use]
    pub fn canned_project(&self, playlist_id: u64) -> Option<Project> {
        self.projects
            .iter()
            .find(|(id, _)| *id == playlist_id)
            .map(|(_, p)| p.clone())
    }

    /// Every (body, target) pair successfully posted so far.
    #[must_use]
    pub fn posted_comments(&self) -> Vec<(String, CommentTarget)> {
        self.posted.borrow().clone()
    }
}

impl Service for MockService {
    fn playlists(&self) -> Source<Vec<Playlist>, ErrorEnvelope> {
        match &self.playlists_error {
            Some(envelope) => Source::failed(envelope.clone()),
            None => Source::value(self.playlists.clone()),
        }
    }

    fn project_for(&self, playlist: &Playlist) -> Source<Project, ErrorEnvelope> {
        if let Some(envelope) = &self.project_error {
            return Source::failed(envelope.clone());
        }
        match self.canned_project(playlist.id) {
            Some(project) => Source::value(project),
            None => Source::failed(ErrorEnvelope::http(404)),
        }
    }

    fn post_comment(&self, body: &str, target: &CommentTarget) -> Source<Comment, ErrorEnvelope> {
        if let Some(envelope) = &self.post_comment_error {
            return Source::failed(envelope.clone());
        }
        let posted = Rc::clone(&self.posted);
        let next_id = Rc::clone(&self.next_comment_id);
        let body = body.to_string();
        let target = target.clone();
        Source::new(move |sink| {
            let id = {
                let mut next = next_id.borrow_mut();
                let id = *next;
                *next += 1;
                id
            };
            posted.borrow_mut().push((body.clone(), target.clone()));
            sink.send(Comment {
                id,
                body: body.clone(),
                author: "you".to_string(),
            });
            sink.complete();
            brook_core::Subscription::empty()
        })
    }
}
