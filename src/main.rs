mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use snaphunt::{
    capture::{capture_round, CaptureOutcome},
    catalog::Catalog,
    classify::{Classifier, ClassifierModel},
    config::{Config, ConfigStore, FileConfigStore},
    hunt::Hunt,
    leaderboard::{FileLeaderboardStore, LeaderboardStore, ScoreRecord},
    runtime::{CrosstermEventSource, HuntEvent, Runner},
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
};

/// terminal scavenger hunt over an image-classification model
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal scavenger hunt: you get a random list of everyday objects and a countdown. Photograph them, point the game at the image files, and a hosted image-classification model decides what you found."
)]
pub struct Cli {
    /// number of objects to hunt per game
    #[clap(short = 'n', long)]
    objects: Option<usize>,

    /// session length in seconds
    #[clap(short = 's', long)]
    seconds: Option<u32>,

    /// player name recorded on the leaderboard
    #[clap(short = 'p', long)]
    player: Option<String>,

    /// image-classification model to query
    #[clap(short = 'm', long, value_enum)]
    model: Option<ClassifierModel>,

    /// classify one image against a fresh target list and exit
    #[clap(long)]
    image: Option<PathBuf>,

    /// print the leaderboard and exit
    #[clap(long)]
    leaderboard: bool,

    /// erase all persisted scores and exit
    #[clap(long)]
    clear_leaderboard: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Welcome,
    Playing,
    Capture,
    Leaderboard,
}

pub struct App {
    pub catalog: Catalog,
    pub classifier: Classifier,
    pub hunt: Hunt,
    pub state: AppState,
    pub capture_input: String,
    pub alert: Option<String>,
    pub leaderboard: Vec<ScoreRecord>,
    pub objects_per_game: usize,
}

impl App {
    pub fn new(config: &Config, store: Box<dyn LeaderboardStore>) -> Self {
        Self {
            catalog: Catalog::new("catalog".to_string()),
            classifier: Classifier::new(parse_model(&config.model)),
            hunt: Hunt::new(
                config.game_duration_secs,
                config.player_name.clone(),
                store,
            ),
            state: AppState::Welcome,
            capture_input: String::new(),
            alert: None,
            leaderboard: Vec::new(),
            objects_per_game: config.objects_per_game,
        }
    }

    pub fn start_hunt(&mut self) {
        let targets = self.catalog.generate_targets(self.objects_per_game);
        self.hunt.start(targets);
        self.capture_input.clear();
        self.alert = None;
        self.state = AppState::Playing;
    }

    pub fn enter_leaderboard(&mut self) {
        self.leaderboard = self.hunt.leaderboard();
        self.state = AppState::Leaderboard;
    }

    /// Advance the session clock; a timeout lands on the leaderboard screen.
    pub fn on_tick(&mut self) {
        if self.hunt.is_running() {
            self.hunt.on_tick();
            if self.hunt.ended {
                self.enter_leaderboard();
            }
        }
    }

    /// Handle one key event. Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.state {
            AppState::Welcome => match key.code {
                KeyCode::Enter | KeyCode::Char('p') => {
                    self.start_hunt();
                    false
                }
                KeyCode::Char('l') => {
                    self.enter_leaderboard();
                    false
                }
                KeyCode::Esc | KeyCode::Char('q') => true,
                _ => false,
            },
            AppState::Playing => match key.code {
                KeyCode::Char('c') => {
                    self.capture_input.clear();
                    self.alert = None;
                    self.state = AppState::Capture;
                    false
                }
                KeyCode::Esc => true,
                _ => false,
            },
            AppState::Capture => match key.code {
                KeyCode::Esc => {
                    // navigating away discards the pending capture
                    self.capture_input.clear();
                    self.state = AppState::Playing;
                    false
                }
                KeyCode::Backspace => {
                    self.capture_input.pop();
                    false
                }
                KeyCode::Enter => {
                    self.perform_capture();
                    false
                }
                KeyCode::Char(c) => {
                    self.capture_input.push(c);
                    false
                }
                _ => false,
            },
            AppState::Leaderboard => match key.code {
                KeyCode::Char('n') | KeyCode::Enter => {
                    self.start_hunt();
                    false
                }
                KeyCode::Char('x') => {
                    self.hunt.clear_leaderboard();
                    self.leaderboard.clear();
                    false
                }
                KeyCode::Esc | KeyCode::Char('q') => true,
                _ => false,
            },
        }
    }

    /// Run one capture round and fold the result back into the session via
    /// the bulk-update hand-off. Any failure resets the capture flow so the
    /// player can retake the photo.
    fn perform_capture(&mut self) {
        let path = self.capture_input.trim().to_string();
        let outcome = capture_round(
            &self.catalog,
            &self.classifier,
            &self.hunt.objects,
            self.hunt.score,
            Path::new(&path),
        );
        self.capture_input.clear();
        self.state = AppState::Playing;

        match outcome {
            Ok(CaptureOutcome::Found {
                name,
                points,
                objects,
                score,
                ..
            }) => {
                self.hunt.apply_update(objects, score);
                self.alert = Some(format!("Found {name}! +{points} points"));
                if self.hunt.ended {
                    self.enter_leaderboard();
                }
            }
            Ok(CaptureOutcome::NoMatch) => {
                self.alert =
                    Some("Nothing from the list in that photo. Try again!".to_string());
            }
            Err(err) => {
                self.alert = Some(err.to_string());
            }
        }
    }
}

fn parse_model(name: &str) -> ClassifierModel {
    <ClassifierModel as ValueEnum>::from_str(name, true).unwrap_or(ClassifierModel::DeitBase)
}

fn resolve_config(cli: &Cli) -> Config {
    let mut config = FileConfigStore::new().load();
    if let Some(n) = cli.objects {
        config.objects_per_game = n;
    }
    if let Some(secs) = cli.seconds {
        config.game_duration_secs = secs;
    }
    if let Some(player) = &cli.player {
        config.player_name = player.clone();
    }
    if let Some(model) = cli.model {
        config.model = model
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_else(|| "deit-base".to_string());
    }
    config
}

fn print_leaderboard(records: &[ScoreRecord]) {
    if records.is_empty() {
        println!("No scores yet.");
        return;
    }
    println!(
        "{:<3} {:<12} {:>6} {:>9} {:>7} {:>5}  {}",
        "#", "Player", "Score", "Objects", "Time", "Done", "Date"
    );
    for (i, record) in records.iter().enumerate() {
        println!(
            "{:<3} {:<12} {:>6} {:>6}/{:<2} {:>7} {:>5}  {}",
            i + 1,
            record.player_name,
            record.score,
            record.objects_found,
            record.total_objects,
            record.time_used,
            if record.completed { "yes" } else { "no" },
            record.date,
        );
    }
}

fn run_image_round(
    config: &Config,
    store: Box<dyn LeaderboardStore>,
    image: &Path,
) -> Result<(), Box<dyn Error>> {
    let catalog = Catalog::new("catalog".to_string());
    let classifier = Classifier::new(parse_model(&config.model));
    let mut hunt = Hunt::new(config.game_duration_secs, config.player_name.clone(), store);
    hunt.start(catalog.generate_targets(config.objects_per_game));

    println!("Targets:");
    for obj in &hunt.objects {
        println!("  {} ({} pts)", obj.name, obj.points);
    }

    match capture_round(&catalog, &classifier, &hunt.objects, hunt.score, image)? {
        CaptureOutcome::Found {
            id, name, points, ..
        } => {
            hunt.mark_found(id, points);
            println!("Match: {name} (+{points} points), score {}", hunt.score);
            if hunt.ended {
                println!("All objects found, session complete.");
            }
        }
        CaptureOutcome::NoMatch => println!("No match against the remaining targets."),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli);
    let store = FileLeaderboardStore::new();

    if cli.clear_leaderboard {
        store.clear();
        println!("Leaderboard cleared.");
        return Ok(());
    }
    if cli.leaderboard {
        print_leaderboard(&store.load());
        return Ok(());
    }
    if let Some(image) = &cli.image {
        return run_image_round(&config, Box::new(store), image);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, Box::new(store));
    start_tui(&mut terminal, &mut app)?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new();
    let runner = Runner::new(events);

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            HuntEvent::Tick => app.on_tick(),
            HuntEvent::Resize => {}
            HuntEvent::Key(key) => {
                if app.handle_key(key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use snaphunt::leaderboard::MemoryLeaderboardStore;

    fn test_app() -> App {
        App::new(&Config::default(), Box::new(MemoryLeaderboardStore::new()))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["snaphunt"]);

        assert_eq!(cli.objects, None);
        assert_eq!(cli.seconds, None);
        assert_eq!(cli.player, None);
        assert_eq!(cli.model, None);
        assert_eq!(cli.image, None);
        assert!(!cli.leaderboard);
        assert!(!cli.clear_leaderboard);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "snaphunt",
            "-n",
            "7",
            "-s",
            "300",
            "-p",
            "Sam",
            "-m",
            "resnet50",
        ]);

        assert_eq!(cli.objects, Some(7));
        assert_eq!(cli.seconds, Some(300));
        assert_eq!(cli.player, Some("Sam".to_string()));
        assert_eq!(cli.model, Some(ClassifierModel::Resnet50));
    }

    #[test]
    fn test_cli_headless_flags() {
        let cli = Cli::parse_from(["snaphunt", "--leaderboard"]);
        assert!(cli.leaderboard);

        let cli = Cli::parse_from(["snaphunt", "--clear-leaderboard"]);
        assert!(cli.clear_leaderboard);

        let cli = Cli::parse_from(["snaphunt", "--image", "photo.jpg"]);
        assert_eq!(cli.image, Some(PathBuf::from("photo.jpg")));
    }

    #[test]
    fn test_resolve_config_applies_overrides() {
        let cli = Cli::parse_from(["snaphunt", "-n", "3", "-s", "60", "-p", "Ana"]);
        let config = resolve_config(&cli);

        assert_eq!(config.objects_per_game, 3);
        assert_eq!(config.game_duration_secs, 60);
        assert_eq!(config.player_name, "Ana");
    }

    #[test]
    fn test_parse_model_accepts_kebab_case_and_falls_back() {
        assert_eq!(parse_model("deit-base"), ClassifierModel::DeitBase);
        assert_eq!(parse_model("resnet50"), ClassifierModel::Resnet50);
        assert_eq!(parse_model("garbage"), ClassifierModel::DeitBase);
    }

    #[test]
    fn test_app_starts_on_welcome_screen() {
        let app = test_app();

        assert_eq!(app.state, AppState::Welcome);
        assert!(!app.hunt.started);
        assert!(app.leaderboard.is_empty());
    }

    #[test]
    fn test_start_hunt_generates_targets() {
        let mut app = test_app();
        app.start_hunt();

        assert_eq!(app.state, AppState::Playing);
        assert!(app.hunt.is_running());
        assert_eq!(app.hunt.objects.len(), app.objects_per_game);
        assert_eq!(app.hunt.score, 0);
    }

    #[test]
    fn test_enter_key_starts_hunt_from_welcome() {
        let mut app = test_app();

        let quit = app.handle_key(key(KeyCode::Enter));

        assert!(!quit);
        assert_eq!(app.state, AppState::Playing);
    }

    #[test]
    fn test_capture_screen_keys() {
        let mut app = test_app();
        app.start_hunt();

        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.state, AppState::Capture);

        for c in "photo.jpg".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.capture_input, "photo.jpg");

        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.capture_input, "photo.jp");

        // Esc discards the pending capture and returns to the game
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Playing);
        assert!(app.capture_input.is_empty());
    }

    #[test]
    fn test_failed_capture_resets_flow_and_surfaces_alert() {
        let mut app = test_app();
        app.start_hunt();
        app.handle_key(key(KeyCode::Char('c')));
        for c in "/no/such/file.jpg".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }

        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.state, AppState::Playing);
        assert!(app.capture_input.is_empty());
        assert!(app.alert.is_some());
        assert!(app.hunt.is_running());
        assert_eq!(app.hunt.score, 0);
    }

    #[test]
    fn test_timeout_lands_on_leaderboard() {
        let cli = Cli::parse_from(["snaphunt", "-s", "2"]);
        let mut app = App::new(
            &resolve_config(&cli),
            Box::new(MemoryLeaderboardStore::new()),
        );
        app.start_hunt();

        app.on_tick();
        assert_eq!(app.state, AppState::Playing);
        app.on_tick();

        assert_eq!(app.state, AppState::Leaderboard);
        assert!(app.hunt.ended);
        assert_eq!(app.leaderboard.len(), 1);
        assert!(!app.leaderboard[0].completed);
    }

    #[test]
    fn test_leaderboard_keys() {
        let mut app = test_app();
        app.enter_leaderboard();
        assert_eq!(app.state, AppState::Leaderboard);

        app.handle_key(key(KeyCode::Char('x')));
        assert!(app.leaderboard.is_empty());

        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Playing);
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        for state in [
            AppState::Welcome,
            AppState::Playing,
            AppState::Capture,
            AppState::Leaderboard,
        ] {
            let mut app = test_app();
            app.state = state;
            let quit = app.handle_key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
            ));
            assert!(quit);
        }
    }

    #[test]
    fn test_ui_renders_all_screens() {
        use ratatui::{backend::TestBackend, Terminal};

        for state in [
            AppState::Welcome,
            AppState::Playing,
            AppState::Capture,
            AppState::Leaderboard,
        ] {
            let mut app = test_app();
            app.start_hunt();
            app.state = state.clone();

            let backend = TestBackend::new(80, 24);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|f| f.render_widget(&app, f.area()))
                .unwrap();

            let buffer = terminal.backend().buffer();
            let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
            assert!(!content.trim().is_empty(), "blank render for {state:?}");
        }
    }

    #[test]
    fn test_ui_renders_leaderboard_with_records() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut app = test_app();
        // a session played with a shorter list than the current config
        app.hunt.start(app.catalog.generate_targets(2));
        app.hunt.finalize(false);
        app.enter_leaderboard();
        assert_eq!(app.leaderboard.len(), 1);
        assert_ne!(app.objects_per_game, 2);

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(&app, f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Jugador"));
        // the row reports the session's own list size, not the config's
        assert!(content.contains("0/2"));
    }

    #[test]
    fn test_print_leaderboard_empty_does_not_panic() {
        print_leaderboard(&[]);
    }
}
