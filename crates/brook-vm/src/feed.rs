#![forbid(unsafe_code)]

//! The feed view-model: browse playlists, commit a focus, play its project.
//!
//! Focus events flow through a [`DebouncedSelection`]; only a committed
//! focus fetches the playlist's featured project, and a newer commit
//! cancels the in-flight fetch through `switch_map`. Service failures never
//! reach outputs — they surface on the errors group as resolved strings.

use std::rc::Rc;
use std::time::Duration;

use brook_core::{Never, Signal, SignalSink, Source, StateCell, Subscription};
use brook_env::{Environment, Playlist, Project};

use crate::selection::DebouncedSelection;
use crate::viewmodel::ViewModel;

/// How long after the last commit the interface stays prominent.
pub const IMPORTANCE_DECAY: Duration = Duration::from_secs(4);

/// What the player should be showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub project_name: String,
    pub video_url: String,
}

pub trait FeedInputs {
    /// The feed became (in)active; focus events are ignored while inactive.
    fn set_active(&self, active: bool);
    /// Focus moved to a playlist row.
    fn focus_playlist(&self, playlist: Playlist);
    /// A playlist row was clicked.
    fn click_playlist(&self, playlist: Playlist);
    fn pause_video_click(&self);
    fn play_video_click(&self);
}

pub trait FeedOutputs {
    /// The browsable playlists; replays the current list on subscribe.
    fn playlists(&self) -> Source<Vec<Playlist>, Never>;
    /// The project to play, one emission per committed focus.
    fn now_playing(&self) -> Signal<NowPlaying, Never>;
    /// Navigation: the playing project, when its playlist is clicked.
    fn select_project(&self) -> Signal<Project, Never>;
    fn video_is_playing(&self) -> Signal<bool, Never>;
    /// Whether browsing chrome should be prominent; decays after a commit,
    /// snaps up on pause, down on play.
    fn interface_importance(&self) -> Signal<bool, Never>;
}

pub trait FeedErrors {
    /// User-facing message for a failed service call.
    fn present_error(&self) -> Signal<String, Never>;
}

pub struct FeedViewModel {
    active: StateCell<bool>,
    focused: StateCell<Option<Playlist>>,
    clicked: StateCell<Option<Playlist>>,
    pause_clicked: StateCell<()>,
    play_clicked: StateCell<()>,
    playlists: StateCell<Vec<Playlist>>,
    selection: DebouncedSelection<Playlist>,
    now_playing: Signal<NowPlaying, Never>,
    select_project: Signal<Project, Never>,
    video_is_playing: Signal<bool, Never>,
    interface_importance: Signal<bool, Never>,
    present_error: Signal<String, Never>,
    _subs: Vec<Subscription>,
}

impl FeedViewModel {
    pub fn new(env: &Rc<Environment>) -> Self {
        let mut subs = Vec::new();

        let active = StateCell::new(false);
        let focused = StateCell::new(None::<Playlist>);
        let clicked = StateCell::new(None::<Playlist>);
        let pause_clicked = StateCell::new(());
        let play_clicked = StateCell::new(());
        let playlists = StateCell::new(Vec::<Playlist>::new());

        let (present_error, error_sink): (Signal<String, Never>, SignalSink<String, Never>) =
            Signal::pipe();

        // Fetch the feed once at construction.
        {
            let cell = playlists.clone();
            let env_err = Rc::clone(env);
            let errors = error_sink.clone();
            tracing::debug!("fetching playlists");
            subs.push(env.service.playlists().start_with(
                move |lists| cell.write(lists.clone()),
                move |e| errors.send(env_err.error_message(e)),
                || {},
            ));
        }

        let selection = DebouncedSelection::new(
            env.debounce_interval,
            Rc::clone(&env.scheduler),
        );

        // Focus only drives selection while the feed is active.
        {
            let selection = selection.clone();
            let active = active.clone();
            subs.push(focused.signal().subscribe(move |maybe| {
                if !active.read() {
                    return;
                }
                if let Some(playlist) = maybe {
                    selection.focus(playlist.clone());
                }
            }));
        }

        // Committed focus -> featured project; a newer commit disconnects
        // the previous in-flight fetch.
        let fetches = selection.commits().switch_map({
            let service = Rc::clone(&env.service);
            move |playlist: &Playlist| {
                tracing::debug!(playlist_id = playlist.id, "fetching featured project");
                service.project_for(playlist).materialize()
            }
        });
        let projects = fetches.values();

        let now_playing_project = StateCell::new(None::<Project>);
        {
            let cell = now_playing_project.clone();
            subs.push(projects.subscribe(move |p| cell.write(Some(p.clone()))));
        }
        let now_playing = projects.map(|p| NowPlaying {
            project_name: p.name.clone(),
            video_url: p.video_url.clone(),
        });

        {
            let env_err = Rc::clone(env);
            let errors = error_sink;
            subs.push(
                fetches
                    .errors()
                    .subscribe(move |e| errors.send(env_err.error_message(e))),
            );
        }

        // Clicking the playlist whose project is playing selects it.
        let select_project = {
            let selection = selection.clone();
            let playing = now_playing_project.clone();
            clicked.signal().filter_map(move |maybe| {
                let playlist = maybe.as_ref()?;
                if selection.committed().as_ref() == Some(playlist) {
                    playing.read()
                } else {
                    None
                }
            })
        };

        let video_is_playing = Signal::merge([
            selection.commits().map_to(true),
            pause_clicked.signal().map_to(false),
            play_clicked.signal().map_to(true),
        ])
        .skip_repeats();

        // Pause's edge is direct while the decay edge is scheduled, so a
        // pause racing a decay at the same instant lands last and wins.
        let interface_importance = Signal::merge([
            selection.commits().map_to(true),
            selection
                .commits()
                .debounce(IMPORTANCE_DECAY, Rc::clone(&env.scheduler))
                .map_to(false),
            pause_clicked.signal().map_to(true),
            play_clicked.signal().map_to(false),
        ])
        .skip_repeats();

        Self {
            active,
            focused,
            clicked,
            pause_clicked,
            play_clicked,
            playlists,
            selection,
            now_playing,
            select_project,
            video_is_playing,
            interface_importance,
            present_error,
            _subs: subs,
        }
    }

    /// The selection machine, exposed for state assertions.
    #[must_use]
    pub fn selection(&self) -> &DebouncedSelection<Playlist> {
        &self.selection
    }
}

impl FeedInputs for FeedViewModel {
    fn set_active(&self, active: bool) {
        self.active.write(active);
    }

    fn focus_playlist(&self, playlist: Playlist) {
        self.focused.write(Some(playlist));
    }

    fn click_playlist(&self, playlist: Playlist) {
        self.clicked.write(Some(playlist));
    }

    fn pause_video_click(&self) {
        self.pause_clicked.write(());
    }

    fn play_video_click(&self) {
        self.play_clicked.write(());
    }
}

impl FeedOutputs for FeedViewModel {
    fn playlists(&self) -> Source<Vec<Playlist>, Never> {
        self.playlists.producer()
    }

    fn now_playing(&self) -> Signal<NowPlaying, Never> {
        self.now_playing.clone()
    }

    fn select_project(&self) -> Signal<Project, Never> {
        self.select_project.clone()
    }

    fn video_is_playing(&self) -> Signal<bool, Never> {
        self.video_is_playing.clone()
    }

    fn interface_importance(&self) -> Signal<bool, Never> {
        self.interface_importance.clone()
    }
}

impl FeedErrors for FeedViewModel {
    fn present_error(&self) -> Signal<String, Never> {
        self.present_error.clone()
    }
}

impl ViewModel for FeedViewModel {
    type Inputs = dyn FeedInputs;
    type Outputs = dyn FeedOutputs;
    type Errors = dyn FeedErrors;

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
