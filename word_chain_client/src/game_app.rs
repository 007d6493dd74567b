use crate::game_service::{GameService, GameState, Player};

use eframe::egui;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::error;

const WARNING_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
struct Feedback {
    text: String,
    success: bool,
}

/// Hot-seat game window: both players share the screen and the word box
/// always plays for whoever is to move.
pub struct GameApp {
    game_service: Arc<GameService>,
    turn_duration: Duration,
    input_word: String,
    feedback: Arc<Mutex<Option<Feedback>>>,
    busy: Arc<Mutex<bool>>,
    turn_key: Option<(u64, bool)>,
    turn_started: Instant,
    timeout_sent_for: Option<u64>,
    last_game: Option<GameState>,
}

impl GameApp {
    pub fn new(game_service: Arc<GameService>, turn_duration: Duration) -> Self {
        Self {
            game_service,
            turn_duration,
            input_word: String::new(),
            feedback: Arc::new(Mutex::new(None)),
            busy: Arc::new(Mutex::new(false)),
            turn_key: None,
            turn_started: Instant::now(),
            timeout_sent_for: None,
            last_game: None,
        }
    }

    /// Loads the current state and opens the update socket.
    pub fn connect(&self, ctx: egui::Context) {
        let service = Arc::clone(&self.game_service);
        let feedback = Arc::clone(&self.feedback);
        let repaint = ctx.clone();

        tokio::spawn(async move {
            if let Err(e) = service.fetch_state().await {
                error!("❌ Failed to fetch game state: {}", e);
                *feedback.lock().await = Some(Feedback {
                    text: format!("Cannot reach server: {e}"),
                    success: false,
                });
            }
            repaint.request_repaint();
        });

        tokio::spawn(Arc::clone(&self.game_service).listen(ctx));
    }

    fn snapshot(&self) -> Option<GameState> {
        self.game_service
            .get_game()
            .try_lock()
            .ok()
            .map(|game| game.clone())
    }

    fn is_busy(&self) -> bool {
        self.busy.try_lock().map(|b| *b).unwrap_or(true)
    }

    fn seconds_left(&self) -> u64 {
        self.turn_duration
            .saturating_sub(self.turn_started.elapsed())
            .as_secs_f32()
            .ceil() as u64
    }

    /// Restarts the countdown whenever a new turn begins.
    fn track_turn(&mut self, game: &GameState) {
        let key = (game.turn, game.in_progress());
        if self.turn_key != Some(key) {
            self.turn_key = Some(key);
            self.turn_started = Instant::now();
        }
    }

    fn check_timer(&mut self, game: &GameState, ctx: &egui::Context) {
        if !game.in_progress() || self.seconds_left() > 0 {
            return;
        }
        if self.timeout_sent_for == Some(game.turn) || self.is_busy() {
            return;
        }
        self.timeout_sent_for = Some(game.turn);

        let player_id = game.current_player;
        self.run(ctx, move |service| async move {
            service.report_timeout(player_id).await.map(|response| Feedback {
                text: response.message,
                success: false,
            })
        });
    }

    /// Runs a server call in the background and shows its outcome.
    fn run<F, Fut>(&self, ctx: &egui::Context, call: F)
    where
        F: FnOnce(Arc<GameService>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = anyhow::Result<Feedback>> + Send + 'static,
    {
        let service = Arc::clone(&self.game_service);
        let feedback = Arc::clone(&self.feedback);
        let busy = Arc::clone(&self.busy);
        let ctx = ctx.clone();

        if let Ok(mut flag) = busy.try_lock() {
            *flag = true;
        }

        tokio::spawn(async move {
            let result = call(service).await;
            *busy.lock().await = false;

            let message = match result {
                Ok(message) => message,
                Err(e) => {
                    error!("❌ Request failed: {}", e);
                    Feedback {
                        text: e.to_string(),
                        success: false,
                    }
                }
            };
            *feedback.lock().await = Some(message);
            ctx.request_repaint();
        });
    }

    fn submit_word(&mut self, game: &GameState, ctx: &egui::Context) {
        let word = self.input_word.trim().to_lowercase();
        if word.is_empty() || self.is_busy() {
            return;
        }
        self.input_word.clear();

        let player_id = game.current_player;
        self.run(ctx, move |service| async move {
            let response = service.play_word(&word, player_id).await?;
            let text = if !response.errors.is_empty() {
                format!("{} {}", response.message, response.errors.join("; "))
            } else if let Some(meaning) = &response.meaning {
                format!("{} Meaning: {}", response.message, meaning)
            } else {
                response.message.clone()
            };
            Ok(Feedback {
                text,
                success: response.success,
            })
        });
    }

    fn render_lobby(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.label("Each word must start with the last letter of the previous word!");
        ui.label("Words need at least 4 letters and can only be used once.");
        ui.add_space(20.0);

        if ui
            .add_enabled(
                !self.is_busy(),
                egui::Button::new(egui::RichText::new("Start New Game").size(22.0))
                    .min_size(egui::vec2(200.0, 40.0)),
            )
            .clicked()
        {
            self.run(ctx, |service| async move {
                service.start_game().await?;
                Ok(Feedback {
                    text: "Game started".to_string(),
                    success: true,
                })
            });
        }
    }

    fn render_player(ui: &mut egui::Ui, player: &Player, active: bool) {
        let color = if active {
            egui::Color32::from_rgb(0, 255, 0)
        } else {
            egui::Color32::from_rgb(180, 180, 180)
        };
        ui.vertical(|ui| {
            ui.label(egui::RichText::new(&player.name).size(20.0).color(color));
            ui.label(
                egui::RichText::new(player.score.to_string())
                    .size(36.0)
                    .color(egui::Color32::from_rgb(0, 191, 255)),
            );
        });
    }

    fn render_game(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, game: &GameState) {
        ui.horizontal(|ui| {
            for player in &game.players {
                Self::render_player(ui, player, player.id == game.current_player);
                ui.add_space(40.0);
            }
        });

        ui.add_space(10.0);

        if game.game_over {
            let text = match game.winner {
                Some(id) => format!("🏆 {} wins!", game.player_name(id)),
                None => "Game over".to_string(),
            };
            ui.label(
                egui::RichText::new(text)
                    .size(30.0)
                    .color(egui::Color32::from_rgb(255, 0, 0)),
            );
        } else {
            ui.label(
                egui::RichText::new(format!("🕐 {}'s turn", game.player_name(game.current_player)))
                    .size(26.0)
                    .color(egui::Color32::from_rgb(0, 255, 0)),
            );

            let seconds = self.seconds_left();
            let timer_color = if seconds <= WARNING_SECONDS {
                egui::Color32::from_rgb(255, 0, 0)
            } else {
                egui::Color32::from_rgb(240, 148, 0)
            };
            ui.label(egui::RichText::new(format!("{seconds}s")).size(30.0).color(timer_color));
        }

        if let Some(letter) = game.required_letter() {
            ui.label(format!("Last word: {}", game.last_word.to_uppercase()));
            ui.label(format!("Next word must start with: {letter}"));
        }

        ui.add_space(10.0);

        if game.in_progress() {
            let hint = match game.required_letter() {
                Some(letter) => format!("Enter word starting with '{letter}'"),
                None => "Enter any word (min 4 letters)".to_string(),
            };
            let busy = self.is_busy();
            let response = ui.add_enabled(
                !busy,
                egui::TextEdit::singleline(&mut self.input_word).hint_text(hint),
            );
            let entered =
                response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));

            ui.horizontal(|ui| {
                let label = if busy { "Validating..." } else { "Submit Word" };
                let clicked = ui
                    .add_enabled(
                        !busy && !self.input_word.trim().is_empty(),
                        egui::Button::new(label),
                    )
                    .clicked();
                if clicked || entered {
                    self.submit_word(game, ctx);
                }

                if ui.button("Reset Game").clicked() {
                    self.run(ctx, |service| async move {
                        service.reset_game().await?;
                        Ok(Feedback {
                            text: "Game reset".to_string(),
                            success: true,
                        })
                    });
                }
            });
        } else if ui.button("🔄 Play Again").clicked() {
            self.run(ctx, |service| async move {
                service.start_game().await?;
                Ok(Feedback {
                    text: "Game started".to_string(),
                    success: true,
                })
            });
        }

        ui.add_space(15.0);
        ui.heading(format!("Word History ({} words)", game.used_words.len()));
        if game.used_words.is_empty() {
            ui.label("No words played yet");
        } else {
            ui.horizontal_wrapped(|ui| {
                for word in &game.used_words {
                    ui.label(egui::RichText::new(word).monospace());
                }
            });
        }
    }
}

impl eframe::App for GameApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // The countdown needs a steady redraw.
        ctx.request_repaint_after(Duration::from_millis(250));

        // Keep showing the last state while a background task holds the lock.
        if let Some(game) = self.snapshot() {
            self.last_game = Some(game);
        }
        let game = self.last_game.clone();
        if let Some(game) = &game {
            self.track_turn(game);
            self.check_timer(game, ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("🎮 Word Chain");
                ui.add_space(10.0);

                let feedback = self.feedback.try_lock().ok().and_then(|f| f.clone());
                if let Some(feedback) = feedback {
                    let color = if feedback.success {
                        egui::Color32::from_rgb(34, 139, 34)
                    } else {
                        egui::Color32::RED
                    };
                    ui.colored_label(color, feedback.text);
                    ui.add_space(10.0);
                }

                match &game {
                    Some(game) if game.game_started => self.render_game(ui, ctx, game),
                    Some(_) => self.render_lobby(ui, ctx),
                    None => {
                        ui.label("🔄 Loading...");
                    }
                }
            });
        });
    }
}
