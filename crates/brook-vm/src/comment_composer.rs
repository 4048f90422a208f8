#![forbid(unsafe_code)]

//! The comment composer view-model: draft, validate, post, dismiss.
//!
//! Posting is gated on a logged-in user and drives the service through
//! `switch_map`, so mashing the post button supersedes rather than stacks
//! requests. Loading state is bookkept by lifecycle hooks around each post.

use std::rc::Rc;

use brook_core::{Never, Signal, StateCell, Subscription};
use brook_env::{Comment, CommentTarget, Environment};

use crate::viewmodel::ViewModel;

pub trait CommentComposerInputs {
    fn view_will_appear(&self);
    fn view_will_disappear(&self);
    /// Set what the comment is being posted on.
    fn present(&self, target: CommentTarget);
    /// The draft text changed.
    fn body_changed(&self, body: &str);
    fn post_pressed(&self);
    fn cancel_pressed(&self);
}

pub trait CommentComposerOutputs {
    /// Local validation: non-blank draft and no post in flight.
    fn post_button_enabled(&self) -> Signal<bool, Never>;
    fn loading_view_hidden(&self) -> Signal<bool, Never>;
    /// One emission per successfully posted comment.
    fn comment_posted(&self) -> Signal<Comment, Never>;
    /// The host should close the composer (cancel or successful post).
    fn wants_dismissal(&self) -> Signal<(), Never>;
    /// The target project's name, emitted as the view appears.
    fn subtitle(&self) -> Signal<String, Never>;
    fn show_keyboard(&self) -> Signal<bool, Never>;
}

pub trait CommentComposerErrors {
    /// User-facing message for a failed post.
    fn present_error(&self) -> Signal<String, Never>;
}

pub struct CommentComposerViewModel {
    appear: StateCell<()>,
    disappear: StateCell<()>,
    target: StateCell<Option<CommentTarget>>,
    body: StateCell<String>,
    post: StateCell<()>,
    cancel: StateCell<()>,
    post_button_enabled: Signal<bool, Never>,
    loading_view_hidden: Signal<bool, Never>,
    comment_posted: Signal<Comment, Never>,
    wants_dismissal: Signal<(), Never>,
    subtitle: Signal<String, Never>,
    show_keyboard: Signal<bool, Never>,
    present_error: Signal<String, Never>,
    _subs: Vec<Subscription>,
}

impl CommentComposerViewModel {
    pub fn new(env: &Rc<Environment>) -> Self {
        let mut subs = Vec::new();

        let appear = StateCell::new(());
        let disappear = StateCell::new(());
        let target = StateCell::new(None::<CommentTarget>);
        let body = StateCell::new(String::new());
        let post = StateCell::new(());
        let cancel = StateCell::new(());
        let loading = StateCell::new(false);

        let post_button_enabled = Signal::merge([
            appear.signal().map_to(false).take(1),
            body.signal().map(|b| !b.trim().is_empty()),
            loading.signal().map(|l| !l),
        ])
        .skip_repeats();

        // Draft + target, snapshotted at each post press, gated on login.
        let submissions = body
            .signal()
            .combine_latest(&target.signal().filter_map(Clone::clone))
            .sample_on(&post.signal())
            .filter({
                let current_user = env.current_user.clone();
                move |_| current_user.is_logged_in()
            });

        let posts = submissions.switch_map({
            let service = Rc::clone(&env.service);
            let loading = loading.clone();
            move |(draft, target): &(String, CommentTarget)| {
                tracing::debug!(project_id = target.project.id, "posting comment");
                let started = loading.clone();
                let ended = loading.clone();
                service
                    .post_comment(draft, target)
                    .on_lifecycle(move || started.write(true), move || ended.write(false))
                    .materialize()
            }
        });

        let comment_posted = posts.values();
        let present_error = posts.errors().map({
            let env = Rc::clone(env);
            move |e| env.error_message(e)
        });

        let loading_view_hidden = Signal::merge([
            appear.signal().map_to(true),
            loading.signal().map(|l| !l),
        ]);

        let wants_dismissal = Signal::merge([
            cancel.signal().map_to(()),
            comment_posted.map_to(()),
        ]);

        let subtitle = target
            .signal()
            .filter_map(|t| t.as_ref().map(|t| t.project.name.clone()))
            .sample_on(&appear.signal());

        let show_keyboard = Signal::merge([
            appear.signal().map_to(true),
            disappear.signal().map_to(false),
        ]);

        {
            let analytics = Rc::clone(&env.analytics);
            let target = target.clone();
            subs.push(comment_posted.subscribe(move |_| {
                let project = target
                    .with(|t| t.as_ref().map(|t| t.project.name.clone()))
                    .unwrap_or_default();
                analytics.track("comment_posted", &[("project", project)]);
            }));
        }

        Self {
            appear,
            disappear,
            target,
            body,
            post,
            cancel,
            post_button_enabled,
            loading_view_hidden,
            comment_posted,
            wants_dismissal,
            subtitle,
            show_keyboard,
            present_error,
            _subs: subs,
        }
    }
}

impl CommentComposerInputs for CommentComposerViewModel {
    fn view_will_appear(&self) {
        self.appear.write(());
    }

    fn view_will_disappear(&self) {
        self.disappear.write(());
    }

    fn present(&self, target: CommentTarget) {
        self.target.write(Some(target));
    }

    fn body_changed(&self, body: &str) {
        self.body.write(body.to_string());
    }

    fn post_pressed(&self) {
        self.post.write(());
    }

    fn cancel_pressed(&self) {
        self.cancel.write(());
    }
}

impl CommentComposerOutputs for CommentComposerViewModel {
    fn post_button_enabled(&self) -> Signal<bool, Never> {
        self.post_button_enabled.clone()
    }

    fn loading_view_hidden(&self) -> Signal<bool, Never> {
        self.loading_view_hidden.clone()
    }

    fn comment_posted(&self) -> Signal<Comment, Never> {
        self.comment_posted.clone()
    }

    fn wants_dismissal(&self) -> Signal<(), Never> {
        self.wants_dismissal.clone()
    }

    fn subtitle(&self) -> Signal<String, Never> {
        self.subtitle.clone()
    }

    fn show_keyboard(&self) -> Signal<bool, Never> {
        self.show_keyboard.clone()
    }
}

impl CommentComposerErrors for CommentComposerViewModel {
    fn present_error(&self) -> Signal<String, Never> {
        self.present_error.clone()
    }
}

impl ViewModel for CommentComposerViewModel {
    type Inputs = dyn CommentComposerInputs;
    type Outputs = dyn CommentComposerOutputs;
    type Errors = dyn CommentComposerErrors;

    fn inputs(&self) -> &Self::Inputs {
        self
    }

    fn outputs(&self) -> &Self::Outputs {
        self
    }

    fn errors(&self) -> &Self::Errors {
        self
    }
}
