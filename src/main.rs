use iced::keyboard::{self, key};
use iced::widget::{button, column, container, row, scrollable, slider, text};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

mod error;
mod export;
mod state;
mod ui;

use state::bucketing::LabelFilter;
use state::data::{Bucket, ImageRecord, Label};
use state::pipeline::{self, AnalysisPipeline, StageAdvance};
use state::score::RandomScore;
use state::session::{MemorySession, SessionStorage, SqliteSession};
use state::store::{DownloadSet, ResultStore};

const IMAGE_FILTER: [&str; 8] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

/// Which page is on screen. Processing is a one-way corridor from
/// Upload to Results; leaving it drops the pipeline (the only way to
/// cancel a run).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Upload,
    Processing,
    Results,
}

/// Main application state
struct PhotoCull {
    screen: Screen,
    /// The culling session: snapshot, view, selection, stats
    store: ResultStore,
    /// Score source for the analysis pipeline (random stub)
    scorer: RandomScore,

    // Upload screen
    selected_files: Vec<PathBuf>,
    selected_bytes: u64,
    upload_threshold: u8,
    pipeline: Option<AnalysisPipeline>,

    // Results screen overlays
    lightbox: Option<ImageRecord>,
    compare: Option<(ImageRecord, ImageRecord)>,

    /// One-shot user notice (precondition failures)
    notice: Option<String>,
    /// Status line in the header
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    // Upload screen
    PickFiles,
    UploadThresholdChanged(u8),
    StartAnalysis,
    /// Timer tick while the staged analysis runs
    StageTick,
    ShowResults,
    BackToUpload,

    // Results screen
    LiveThresholdChanged(u8),
    CardClicked(String),
    StarClicked(String, u8),
    LabelCycled(String),
    MinRatingChanged(u8),
    LabelFilterChanged(LabelFilter),
    Download(DownloadSet),
    OpenCompare,
    CloseCompare,
    CloseLightbox,

    // Keyboard navigation
    FocusNext,
    FocusPrev,
    ToggleFocusedSelection,
    MoveFocused(Bucket),
    RateFocused(u8),
    LabelFocused(Label),
    Escape,
}

impl PhotoCull {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        // Storage problems never stop the app: fall back to an
        // in-memory session (nothing survives the process).
        let session: Box<dyn SessionStorage> = match SqliteSession::new() {
            Ok(session) => Box::new(session),
            Err(err) => {
                eprintln!("⚠️  Session database unavailable ({err}). Running in memory.");
                Box::new(MemorySession::default())
            }
        };

        let store = ResultStore::restore(session);
        println!("🎞️  Photo Cull initialized with {} images", store.stats().total);

        let upload_threshold = store.threshold();
        let app = PhotoCull {
            screen: Screen::Upload,
            store,
            scorer: RandomScore,
            selected_files: Vec::new(),
            selected_bytes: 0,
            upload_threshold,
            pipeline: None,
            lightbox: None,
            compare: None,
            notice: None,
            status: String::from("Ready."),
        };

        (app, Task::none())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // ---- upload screen --------------------------------
            Message::PickFiles => {
                let picked = FileDialog::new()
                    .set_title("Select Images to Analyze")
                    .add_filter("Images", &IMAGE_FILTER)
                    .pick_files();

                if let Some(files) = picked {
                    let total_bytes: u64 = files
                        .iter()
                        .filter_map(|path| std::fs::metadata(path).ok())
                        .map(|meta| meta.len())
                        .sum();

                    // A rejected batch leaves the previous one intact
                    match pipeline::validate_selection(&files, total_bytes) {
                        Ok(()) => {
                            self.notice = None;
                            self.selected_files = files;
                            self.selected_bytes = total_bytes;
                        }
                        Err(err) => self.notice = Some(err.to_string()),
                    }
                }
                Task::none()
            }
            Message::UploadThresholdChanged(value) => {
                self.upload_threshold = value;
                Task::none()
            }
            Message::StartAnalysis => {
                if !self.selected_files.is_empty() {
                    self.pipeline = Some(AnalysisPipeline::new(
                        self.selected_files.clone(),
                        self.upload_threshold,
                    ));
                    self.screen = Screen::Processing;
                }
                Task::none()
            }
            Message::StageTick => {
                if let Some(pipeline) = &mut self.pipeline {
                    match pipeline.advance(&mut self.scorer) {
                        StageAdvance::InProgress(_) => {}
                        StageAdvance::Finished(results) => {
                            self.store.initialize(results, self.upload_threshold);
                            self.pipeline = None;
                            self.lightbox = None;
                            self.compare = None;
                            self.status = String::from("Analysis complete.");
                            self.screen = Screen::Results;
                        }
                    }
                }
                Task::none()
            }
            Message::ShowResults => {
                self.screen = Screen::Results;
                Task::none()
            }
            Message::BackToUpload => {
                // Leaving the processing screen is the only way to
                // cancel a run
                self.pipeline = None;
                self.lightbox = None;
                self.compare = None;
                self.notice = None;
                self.store.clear_focus();
                self.screen = Screen::Upload;
                Task::none()
            }

            // ---- results screen -------------------------------
            Message::LiveThresholdChanged(value) => {
                self.store.apply_threshold(value);
                self.refresh_lightbox();
                Task::none()
            }
            Message::CardClicked(src) => {
                self.store.toggle_selection(&src);
                Task::none()
            }
            Message::StarClicked(src, rating) => {
                self.store.set_rating(&src, rating);
                Task::none()
            }
            Message::LabelCycled(src) => {
                self.store.cycle_label(&src);
                Task::none()
            }
            Message::MinRatingChanged(value) => {
                self.store.set_min_rating(value);
                self.refresh_lightbox();
                Task::none()
            }
            Message::LabelFilterChanged(filter) => {
                self.store.set_label_filter(filter);
                self.refresh_lightbox();
                Task::none()
            }
            Message::Download(set) => {
                match self.store.download_records(set) {
                    Err(err) => self.notice = Some(err.to_string()),
                    Ok(records) if records.is_empty() => {}
                    Ok(records) => {
                        let dest = FileDialog::new()
                            .set_title("Choose Export Folder")
                            .pick_folder();
                        if let Some(dest) = dest {
                            let copied = export::export_records(&records, &dest);
                            self.status = format!("Exported {copied} images.");
                        }
                    }
                }
                Task::none()
            }
            Message::OpenCompare => {
                match self.store.compare_pair() {
                    Ok(pair) => {
                        self.notice = None;
                        self.compare = Some(pair);
                    }
                    Err(err) => self.notice = Some(err.to_string()),
                }
                Task::none()
            }
            Message::CloseCompare => {
                self.compare = None;
                Task::none()
            }
            Message::CloseLightbox => {
                self.lightbox = None;
                Task::none()
            }

            // ---- keyboard navigation --------------------------
            Message::FocusNext => {
                if self.compare.is_none() {
                    self.lightbox = self.store.focus_next();
                }
                Task::none()
            }
            Message::FocusPrev => {
                if self.compare.is_none() {
                    self.lightbox = self.store.focus_prev();
                }
                Task::none()
            }
            Message::ToggleFocusedSelection => {
                self.store.toggle_focused_selection();
                Task::none()
            }
            Message::MoveFocused(target) => {
                self.store.move_focused(target);
                self.refresh_lightbox();
                Task::none()
            }
            Message::RateFocused(rating) => {
                self.store.rate_focused(rating);
                self.refresh_lightbox();
                Task::none()
            }
            Message::LabelFocused(label) => {
                self.store.label_focused(label);
                self.refresh_lightbox();
                Task::none()
            }
            Message::Escape => {
                if self.compare.is_some() {
                    self.compare = None;
                } else if self.lightbox.is_some() {
                    self.lightbox = None;
                } else {
                    self.notice = None;
                }
                Task::none()
            }
        }
    }

    /// Keep the lightbox in sync with the focused record after a
    /// mutation regenerated the view.
    fn refresh_lightbox(&mut self) {
        if self.lightbox.is_some() {
            self.lightbox = self.store.focused().cloned();
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match self.screen {
            Screen::Upload => self.upload_view(),
            Screen::Processing => self.processing_view(),
            Screen::Results => self.results_view(),
        }
    }

    fn upload_view(&self) -> Element<Message> {
        let size_mb = self.selected_bytes as f64 / (1024.0 * 1024.0);
        let max_mb = pipeline::MAX_TOTAL_BYTES / (1024 * 1024);

        let mut content = column![
            text("Photo Cull").size(48),
            text("Upload a batch and let the analyzer split sharp from blurry.").size(16),
            row![
                text(format!("Sharpness threshold: {}", self.upload_threshold)).size(14),
                slider(0..=100u8, self.upload_threshold, Message::UploadThresholdChanged)
                    .width(Length::Fixed(260.0)),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
            button("Select Images…").on_press(Message::PickFiles).padding(10),
            text(format!(
                "{} / {} images · {size_mb:.2} / {max_mb} MB",
                self.selected_files.len(),
                pipeline::MAX_FILES,
            ))
            .size(14),
            button("Start Analysis")
                .padding(10)
                .on_press_maybe(
                    (!self.selected_files.is_empty()).then_some(Message::StartAnalysis),
                ),
            button("View Results").on_press(Message::ShowResults).padding(6),
        ]
        .spacing(18)
        .align_x(Alignment::Center);

        if let Some(notice) = &self.notice {
            content = content.push(text(notice.clone()).size(14));
        }

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn processing_view(&self) -> Element<Message> {
        let status = self
            .pipeline
            .as_ref()
            .map(AnalysisPipeline::status)
            .unwrap_or("Preparing…");

        let content = column![
            text("Analyzing").size(36),
            text(status).size(18),
            text(format!("{} images in this batch", self.selected_files.len())).size(14),
            button("Cancel").on_press(Message::BackToUpload).padding(6),
        ]
        .spacing(20)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn results_view(&self) -> Element<Message> {
        // Overlays take over the whole screen while open
        if let Some(pair) = &self.compare {
            return ui::overlays::compare(pair);
        }
        if let Some(record) = &self.lightbox {
            return ui::overlays::lightbox(record);
        }

        let stats = self.store.stats();
        let view = self.store.current_view();

        let mode_badge = if self.store.demo_mode() {
            "Demo data"
        } else {
            "Live upload"
        };

        let header = row![
            button("← Back").on_press(Message::BackToUpload).padding(6),
            text("Results").size(32),
            text(mode_badge).size(13),
            text(&self.status).size(13).width(Length::Fill),
            text(format!(
                "Session: {} images",
                self.store.original_snapshot().len()
            ))
            .size(13),
            text(format!("Threshold used: {}", self.store.threshold())).size(13),
        ]
        .spacing(14)
        .align_y(Alignment::Center);

        let stat_row = row![
            stat_block("Total", stats.total.to_string()),
            stat_block("Sharp", stats.sharp.to_string()),
            stat_block("Blurry", stats.blurry.to_string()),
            stat_block("Selected", stats.selected.to_string()),
        ]
        .spacing(24);

        let threshold_row = row![
            text(format!("Live threshold: {}", self.store.threshold())).size(14),
            slider(0..=100u8, self.store.threshold(), Message::LiveThresholdChanged)
                .width(Length::Fixed(300.0)),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let filter_row = row![
            text(format!("Min rating: {}", self.store.min_rating())).size(14),
            slider(0..=5u8, self.store.min_rating(), Message::MinRatingChanged)
                .width(Length::Fixed(120.0)),
            text("Label:").size(14),
            label_filter_button("All", LabelFilter::Any, self.store.label_filter()),
            label_filter_button("Green", LabelFilter::Only(Label::Green), self.store.label_filter()),
            label_filter_button("Yellow", LabelFilter::Only(Label::Yellow), self.store.label_filter()),
            label_filter_button("Red", LabelFilter::Only(Label::Red), self.store.label_filter()),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let action_row = row![
            button("Download All").on_press(Message::Download(DownloadSet::All)).padding(6),
            button("Download Sharp").on_press(Message::Download(DownloadSet::Sharp)).padding(6),
            button("Download Blurry").on_press(Message::Download(DownloadSet::Blurry)).padding(6),
            button("Download Selected")
                .on_press(Message::Download(DownloadSet::Selected))
                .padding(6),
            button("Compare (2)").on_press(Message::OpenCompare).padding(6),
        ]
        .spacing(10);

        let summary = row![
            text(stats.summary_counts()).size(14).width(Length::Fill),
            text(stats.summary_average()).size(14),
        ];

        let grids = row![
            ui::cards::bucket_grid("Sharp", &view.sharp, "No sharp images detected.", &self.store),
            ui::cards::bucket_grid("Blurry", &view.blurry, "No blurry images detected.", &self.store),
        ]
        .spacing(28);

        let mut content = column![header, stat_row, threshold_row, filter_row, action_row, summary]
            .spacing(14)
            .padding(20);

        if let Some(notice) = &self.notice {
            content = content.push(text(notice.clone()).size(14));
        }

        content = content.push(grids);

        scrollable(content).width(Length::Fill).height(Length::Fill).into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        match self.screen {
            // Advance the staged "analysis" once per interval
            Screen::Processing => {
                iced::time::every(pipeline::STAGE_INTERVAL).map(|_| Message::StageTick)
            }
            Screen::Results => keyboard::on_key_press(handle_key),
            Screen::Upload => Subscription::none(),
        }
    }
}

fn stat_block<'a>(label: &'a str, value: String) -> Element<'a, Message> {
    column![text(value).size(24), text(label).size(12)]
        .align_x(Alignment::Center)
        .into()
}

fn label_filter_button(
    name: &str,
    filter: LabelFilter,
    active: LabelFilter,
) -> Element<'_, Message> {
    let style = if filter == active {
        button::primary
    } else {
        button::secondary
    };
    button(text(name).size(13))
        .style(style)
        .padding(6)
        .on_press(Message::LabelFilterChanged(filter))
        .into()
}

/// Results-screen keyboard map, mirroring the card affordances.
fn handle_key(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key.as_ref() {
        keyboard::Key::Named(key::Named::ArrowRight) => Some(Message::FocusNext),
        keyboard::Key::Named(key::Named::ArrowLeft) => Some(Message::FocusPrev),
        keyboard::Key::Named(key::Named::Space) => Some(Message::ToggleFocusedSelection),
        keyboard::Key::Named(key::Named::Escape) => Some(Message::Escape),
        keyboard::Key::Character(c) => match c {
            "s" | "S" => Some(Message::MoveFocused(Bucket::Sharp)),
            "b" | "B" => Some(Message::MoveFocused(Bucket::Blurry)),
            "g" | "G" => Some(Message::LabelFocused(Label::Green)),
            "y" | "Y" => Some(Message::LabelFocused(Label::Yellow)),
            "r" | "R" => Some(Message::LabelFocused(Label::Red)),
            "1" | "2" | "3" | "4" | "5" => c.parse().ok().map(Message::RateFocused),
            _ => None,
        },
        _ => None,
    }
}

fn main() -> iced::Result {
    iced::application("Photo Cull", PhotoCull::update, PhotoCull::view)
        .theme(PhotoCull::theme)
        .subscription(PhotoCull::subscription)
        .centered()
        .run_with(PhotoCull::new)
}
