use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::chart::scene::{BarChart, LineChart, Scene};
use crate::config::Config;
use crate::data::aggregate::Analysis;
use crate::data::loader::{self, DataSource, LoadError};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

type LoadResult = Result<Dataset, LoadError>;

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Source of the current (or in-flight) dataset.
    pub source: Option<DataSource>,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Dataset>,

    /// Aggregates of `dataset`, computed once per load.
    pub analysis: Option<Analysis>,

    /// Revenue line chart and director bar chart.
    pub charts: Option<(Scene, Scene)>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,

    pending: Option<Receiver<LoadResult>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            source: None,
            dataset: None,
            analysis: None,
            charts: None,
            status_message: None,
            loading: false,
            pending: None,
        }
    }

    /// Fetch and parse `source` on a worker thread. Any earlier in-flight
    /// load is abandoned.
    pub fn start_loading(&mut self, source: DataSource) {
        let (tx, rx) = mpsc::channel();
        let columns = self.config.columns.clone();
        let worker_source = source.clone();
        thread::spawn(move || {
            // The receiver is gone if a newer load replaced this one.
            let _ = tx.send(loader::load(&worker_source, &columns));
        });

        log::info!("Loading {source}");
        self.source = Some(source);
        self.pending = Some(rx);
        self.loading = true;
        self.status_message = None;
    }

    /// Check for a finished load. Returns `true` when state changed.
    pub fn poll_loading(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        match rx.try_recv() {
            Ok(Ok(dataset)) => {
                self.pending = None;
                self.set_dataset(dataset);
                true
            }
            Ok(Err(err)) => {
                self.pending = None;
                self.set_load_error(err);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.loading = false;
                self.status_message = Some("Error: loader stopped unexpectedly".into());
                true
            }
        }
    }

    /// Ingest a newly loaded dataset and run both pipelines.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let analysis = Analysis::compute(&dataset, &self.config.analysis);
        let layout = &self.config.layout;
        self.charts = Some((
            LineChart::new(&analysis.yearly, layout).scene(),
            BarChart::new(&analysis.directors, layout).scene(),
        ));
        self.analysis = Some(analysis);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// A failed load leaves nothing from the previous dataset on screen.
    pub fn set_load_error(&mut self, err: LoadError) {
        let err = anyhow::Error::new(err);
        log::error!("Failed to load dataset: {err:#}");
        self.status_message = Some(format!("Error: {err:#}"));
        self.dataset = None;
        self.analysis = None;
        self.charts = None;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use crate::data::model::Record;

    fn wait_for_load(state: &mut AppState) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !state.poll_loading() {
            assert!(Instant::now() < deadline, "load did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn set_dataset_builds_both_charts() {
        let mut state = AppState::new(Config::default());
        let records = vec![Record {
            gross: Some(10.0),
            score: Some(8.0),
            year: Some(2012),
            director: "A".into(),
            ..Record::default()
        }];
        state.set_dataset(Dataset::from_records(records, &state.config.columns.clone()));

        let analysis = state.analysis.as_ref().unwrap();
        assert_eq!(analysis.yearly.len(), 1);
        assert_eq!(analysis.directors.len(), 1);
        assert!(state.charts.is_some());
        assert!(!state.loading);
    }

    #[test]
    fn background_load_then_analysis() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "gross,score,year,director").unwrap();
        writeln!(file, "100,8,2010,A").unwrap();
        writeln!(file, "50,6,2010,A").unwrap();

        let mut state = AppState::new(Config::default());
        state.start_loading(DataSource::File(file.path().to_path_buf()));
        assert!(state.loading);
        wait_for_load(&mut state);

        assert!(!state.loading);
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(2));
        let analysis = state.analysis.as_ref().unwrap();
        assert_eq!(analysis.yearly[0].gross_total, 150.0);
        assert_eq!(analysis.directors[0].average_score, 7.0);
    }

    #[test]
    fn failed_load_clears_previous_charts() {
        let mut state = AppState::new(Config::default());
        state.set_dataset(Dataset::default());
        assert!(state.charts.is_some());

        state.start_loading(DataSource::File(PathBuf::from("/no/such/movies.csv")));
        wait_for_load(&mut state);

        assert!(state.charts.is_none());
        assert!(state.analysis.is_none());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.starts_with("Error: reading /no/such/movies.csv"));
    }

    #[test]
    fn unreachable_remote_runs_no_analysis() {
        let mut state = AppState::new(Config::default());
        state.start_loading(DataSource::parse("http://127.0.0.1:1/movies.csv"));
        wait_for_load(&mut state);

        assert!(state.dataset.is_none());
        assert!(state.analysis.is_none());
        assert!(state.charts.is_none());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.starts_with("Error: fetching http://127.0.0.1:1/movies.csv"));
    }
}
