//! Property test: any balanced push/pop sequence restores the base.

use std::rc::Rc;

use proptest::prelude::*;

use brook_core::Source;
use brook_env::{
    Comment, CommentTarget, Environment, EnvironmentStack, ErrorEnvelope, Playlist, Project,
    Service,
};

struct StubService;

impl Service for StubService {
    fn playlists(&self) -> Source<Vec<Playlist>, ErrorEnvelope> {
        Source::value(Vec::new())
    }
    fn project_for(&self, _playlist: &Playlist) -> Source<Project, ErrorEnvelope> {
        Source::failed(ErrorEnvelope::http(404))
    }
    fn post_comment(&self, _body: &str, _target: &CommentTarget) -> Source<Comment, ErrorEnvelope> {
        Source::failed(ErrorEnvelope::http(404))
    }
}

fn env(locale: String) -> Rc<Environment> {
    Environment::builder(Rc::new(StubService)).locale(locale).build()
}

proptest! {
    #[test]
    fn balanced_push_pop_always_restores_the_base(ops in prop::collection::vec(any::<bool>(), 0..60)) {
        let stack = EnvironmentStack::new(env("base".to_string()));
        let mut shadow: Vec<String> = vec!["base".to_string()];

        for (i, push) in ops.iter().enumerate() {
            if *push {
                let locale = format!("override-{i}");
                stack.push(env(locale.clone()));
                shadow.push(locale);
            } else if shadow.len() > 1 {
                stack.pop();
                shadow.pop();
            }
            prop_assert_eq!(stack.depth(), shadow.len());
            prop_assert_eq!(&stack.current().locale, shadow.last().expect("non-empty"));
        }

        while shadow.len() > 1 {
            stack.pop();
            shadow.pop();
        }
        prop_assert_eq!(stack.depth(), 1);
        prop_assert_eq!(&stack.current().locale, "base");
    }
}
