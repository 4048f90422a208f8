//! Feed view-model scenarios on the virtual clock.

use std::rc::Rc;
use std::time::Duration;

use brook_core::TestScheduler;
use brook_env::{Environment, ErrorEnvelope, KeyedStrings, Playlist};
use brook_harness::{MockService, TestEnvironment, TestObserver, test_environment};
use brook_vm::{FeedErrors, FeedInputs, FeedOutputs, FeedViewModel, IMPORTANCE_DECAY, NowPlaying};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn active_feed(t: &TestEnvironment) -> FeedViewModel {
    let vm = FeedViewModel::new(&t.env);
    vm.set_active(true);
    vm
}

#[test]
fn playlists_are_fetched_at_construction_and_replayed() {
    let t = test_environment();
    let vm = FeedViewModel::new(&t.env);

    let mut playlists = TestObserver::new();
    playlists.observe_source(&vm.playlists());
    assert_eq!(playlists.values(), vec![t.service.canned_playlists()]);
}

#[test]
fn focus_commits_only_after_the_debounce_interval() {
    let t = test_environment();
    let vm = active_feed(&t);
    let mut now_playing = TestObserver::new();
    now_playing.observe(&vm.now_playing());

    let featured = t.service.canned_playlists()[0].clone();
    vm.focus_playlist(featured.clone());

    t.scheduler.advance_by(ms(1199));
    assert!(!now_playing.did_emit_value(), "focus has not settled yet");

    t.scheduler.advance_by(ms(1));
    let project = t.service.canned_project(featured.id).expect("fixture");
    now_playing.assert_values(&[NowPlaying {
        project_name: project.name,
        video_url: project.video_url,
    }]);
}

#[test]
fn refocusing_restarts_the_clock_and_drops_the_first_playlist() {
    let t = test_environment();
    let vm = active_feed(&t);
    let mut now_playing = TestObserver::new();
    now_playing.observe(&vm.now_playing());

    let lists = t.service.canned_playlists();
    vm.focus_playlist(lists[0].clone());
    t.scheduler.advance_by(ms(500));
    vm.focus_playlist(lists[1].clone());

    // 1.2s after the first focus: the second has only held for 0.7s.
    t.scheduler.advance_by(ms(700));
    assert!(!now_playing.did_emit_value());

    t.scheduler.advance_by(ms(500));
    let project = t.service.canned_project(lists[1].id).expect("fixture");
    assert_eq!(
        now_playing.values().iter().map(|n| n.project_name.clone()).collect::<Vec<_>>(),
        vec![project.name],
        "only the surviving focus plays"
    );
}

#[test]
fn focus_is_ignored_while_inactive() {
    let t = test_environment();
    let vm = FeedViewModel::new(&t.env);
    let mut now_playing = TestObserver::new();
    now_playing.observe(&vm.now_playing());

    vm.focus_playlist(t.service.canned_playlists()[0].clone());
    t.scheduler.advance_by(ms(5000));
    assert!(!now_playing.did_emit_value());
}

#[test]
fn clicking_the_playing_playlist_selects_its_project() {
    let t = test_environment();
    let vm = active_feed(&t);
    let mut selected = TestObserver::new();
    selected.observe(&vm.select_project());

    let lists = t.service.canned_playlists();
    vm.click_playlist(lists[0].clone());
    assert!(!selected.did_emit_value(), "nothing playing yet");

    vm.focus_playlist(lists[0].clone());
    t.scheduler.advance_by(ms(1200));

    vm.click_playlist(lists[1].clone());
    assert!(!selected.did_emit_value(), "clicked playlist is not the one playing");

    vm.click_playlist(lists[0].clone());
    let project = t.service.canned_project(lists[0].id).expect("fixture");
    selected.assert_values(&[project]);
}

#[test]
fn video_playback_follows_commits_and_transport_clicks() {
    let t = test_environment();
    let vm = active_feed(&t);
    let mut playing = TestObserver::new();
    playing.observe(&vm.video_is_playing());

    vm.focus_playlist(t.service.canned_playlists()[0].clone());
    t.scheduler.advance_by(ms(1200));
    vm.pause_video_click();
    vm.pause_video_click();
    vm.play_video_click();

    playing.assert_values(&[true, false, true]);
}

#[test]
fn interface_importance_decays_after_a_commit() {
    let t = test_environment();
    let vm = active_feed(&t);
    let mut importance = TestObserver::new();
    importance.observe(&vm.interface_importance());

    vm.focus_playlist(t.service.canned_playlists()[0].clone());
    t.scheduler.advance_by(ms(1200));
    importance.assert_values(&[true]);

    t.scheduler.advance_by(IMPORTANCE_DECAY - ms(1));
    importance.assert_values(&[true]);
    t.scheduler.advance_by(ms(1));
    importance.assert_values(&[true, false]);
}

#[test]
fn a_new_commit_postpones_the_decay() {
    let t = test_environment();
    let vm = active_feed(&t);
    let mut importance = TestObserver::new();
    importance.observe(&vm.interface_importance());

    let lists = t.service.canned_playlists();
    vm.focus_playlist(lists[0].clone());
    t.scheduler.advance_by(ms(1200));
    t.scheduler.advance_by(ms(2000));
    vm.focus_playlist(lists[1].clone());
    t.scheduler.advance_by(ms(1200));

    // 4s after the first commit, but only 1.2s after the second.
    t.scheduler.advance_by(ms(800));
    importance.assert_values(&[true]);

    t.scheduler.advance_by(IMPORTANCE_DECAY);
    importance.assert_values(&[true, false]);
}

#[test]
fn pause_and_play_move_importance_directly() {
    let t = test_environment();
    let vm = active_feed(&t);
    let mut importance = TestObserver::new();
    importance.observe(&vm.interface_importance());

    vm.focus_playlist(t.service.canned_playlists()[0].clone());
    t.scheduler.advance_by(ms(1200));
    vm.play_video_click();
    importance.assert_values(&[true, false]);
    vm.pause_video_click();
    importance.assert_values(&[true, false, true]);
}

#[test]
fn failed_project_fetch_surfaces_a_localized_message() {
    let scheduler = TestScheduler::new();
    let service = Rc::new(MockService::new().failing_projects(ErrorEnvelope::http(404)));
    let env = Environment::builder(Rc::clone(&service) as Rc<dyn brook_env::Service>)
        .scheduler(scheduler.handle())
        .strings(Rc::new(KeyedStrings::from_pairs([(
            "errors.unknown_resource",
            "Couldn't find that project.",
        )])))
        .build();
    let vm = FeedViewModel::new(&env);
    vm.set_active(true);

    let mut errors = TestObserver::new();
    errors.observe(&vm.present_error());
    let mut now_playing = TestObserver::new();
    now_playing.observe(&vm.now_playing());

    vm.focus_playlist(service.canned_playlists()[0].clone());
    scheduler.advance_by(ms(1200));

    errors.assert_values(&["Couldn't find that project.".to_string()]);
    assert!(!now_playing.did_emit_value(), "failures never reach outputs");
}

#[test]
fn unlocalized_failure_falls_back_to_the_envelope_message() {
    let scheduler = TestScheduler::new();
    let service = Rc::new(
        MockService::new().failing_projects(ErrorEnvelope::message("The project has ended.")),
    );
    let env = Environment::builder(Rc::clone(&service) as Rc<dyn brook_env::Service>)
        .scheduler(scheduler.handle())
        .build();
    let vm = FeedViewModel::new(&env);
    vm.set_active(true);

    let mut errors = TestObserver::new();
    errors.observe(&vm.present_error());
    vm.focus_playlist(service.canned_playlists()[0].clone());
    scheduler.advance_by(ms(1200));

    errors.assert_values(&["The project has ended.".to_string()]);
}

#[test]
fn a_failed_fetch_does_not_wedge_later_commits() {
    let t = test_environment();
    let vm = active_feed(&t);
    let mut now_playing = TestObserver::new();
    now_playing.observe(&vm.now_playing());
    let mut errors = TestObserver::new();
    errors.observe(&vm.present_error());

    // A playlist outside the fixtures 404s.
    vm.focus_playlist(Playlist {
        id: 999,
        name: "Stray".into(),
    });
    t.scheduler.advance_by(ms(1200));
    assert!(errors.did_emit_value());
    assert!(!now_playing.did_emit_value());

    let featured = t.service.canned_playlists()[0].clone();
    vm.focus_playlist(featured.clone());
    t.scheduler.advance_by(ms(1200));
    assert_eq!(
        now_playing.last().map(|n| n.project_name),
        t.service.canned_project(featured.id).map(|p| p.name)
    );
}
