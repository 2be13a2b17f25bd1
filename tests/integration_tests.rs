use async_trait::async_trait;
use outbreak_brief::assistant::{AssistantService, Run};
use outbreak_brief::cli::Command;
use outbreak_brief::config::Config;
use outbreak_brief::dashboard::{Dashboard, run_command};
use outbreak_brief::data::Dataset;
use outbreak_brief::geo::{GeocodeFailure, Geocoder, RegionResolver};
use outbreak_brief::metrics::MetricsAggregator;
use outbreak_brief::session::BriefingKind;
use outbreak_brief::types::{Coordinates, RunStatus, ThreadMessage};
use outbreak_brief::{BriefingError, Result};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

const OUTBREAKS_CSV: &str = "\
,name,Country,cases,description,sentiment,outbreak,deaths,region
0,Avian influenza,Cambodia,120,H5N1 cases reported among poultry workers,-0.4,TRUE,3,Asia; Europe
1,swine flu,India,45,Seasonal H1N1 uptick in Kerala,-0.2,TRUE,1,Kerala
2,common cold,UK,10,Not notable,0.1,FALSE,0,London
";

const DETAILS_CSV: &str = "\
outbreak_name,negative_sentiment,impacts
Avian influenza,67.5,\"['Poultry culls', 'Travel advisories']\"
";

/// 写入测试用的两张数据表
fn write_tables(dir: &Path) -> Config {
    fs::write(dir.join("news_output.csv"), OUTBREAKS_CSV).unwrap();
    fs::write(dir.join("llm_news_detail.csv"), DETAILS_CSV).unwrap();

    let mut config = Config::default();
    config.data.outbreaks_path = dir.join("news_output.csv");
    config.data.details_path = dir.join("llm_news_detail.csv");
    config.assistant.api_key = "sk-test".to_string();
    config.assistant.briefing_assistant_id = "asst_briefing".to_string();
    config.assistant.comparison_assistant_id = "asst_comparison".to_string();
    config.assistant.poll_interval_ms = 1;
    config.dashboard.extract_delay_ms = 0;
    config
}

/// 先排队、再运行、最后完成的假助手服务
#[derive(Default)]
struct QueuedAssistant {
    polls: Mutex<u32>,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl AssistantService for QueuedAssistant {
    async fn create_thread(&self, initial_message: &str) -> Result<String> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(initial_message.to_string());
        Ok(format!("thread_{}", prompts.len()))
    }

    async fn create_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<Run> {
        *self.polls.lock().unwrap() = 0;
        Ok(Run {
            id: "run_1".to_string(),
            status: RunStatus::Queued,
            last_error: None,
        })
    }

    async fn get_run(&self, _thread_id: &str, run_id: &str) -> Result<Run> {
        let mut polls = self.polls.lock().unwrap();
        *polls += 1;
        let status = match *polls {
            1 => RunStatus::InProgress,
            _ => RunStatus::Completed,
        };
        Ok(Run {
            id: run_id.to_string(),
            status,
            last_error: None,
        })
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        Ok(vec![
            ThreadMessage {
                role: "assistant".to_string(),
                content: format!("- Answer on {}", thread_id),
            },
            ThreadMessage::user("earlier"),
        ])
    }
}

struct ContinentGeocoder;

#[async_trait]
impl Geocoder for ContinentGeocoder {
    async fn geocode(&self, place: &str) -> std::result::Result<Coordinates, GeocodeFailure> {
        match place {
            "Asia" => Ok(Coordinates {
                latitude: 34.0,
                longitude: 100.6,
            }),
            "Europe" => Ok(Coordinates {
                latitude: 54.5,
                longitude: 15.3,
            }),
            _ => Err(GeocodeFailure::NotFound(place.to_string())),
        }
    }
}

#[tokio::test]
async fn test_avian_influenza_metrics_from_csv() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_tables(temp_dir.path());
    let dataset = Dataset::load(&config.data).unwrap();
    let resolver = RegionResolver::new(ContinentGeocoder, config.geocoder.point_weight);

    let bundle = MetricsAggregator::get_metrics("Avian influenza", dataset.outbreaks()).unwrap();
    assert_eq!(bundle.cases, 120);
    assert_eq!(bundle.deaths, 3);
    assert!(bundle.outbreak);

    let points =
        MetricsAggregator::get_region("Avian influenza", dataset.outbreaks(), &resolver)
            .await
            .unwrap();
    assert_eq!(points.len(), 2);
    assert!(points.iter().all(|p| p.is_resolved() && p.weight == 100));

    assert_eq!(
        MetricsAggregator::get_impact("Avian influenza", dataset.details()).unwrap(),
        "Poultry culls; Travel advisories"
    );
    assert_eq!(
        MetricsAggregator::get_negative_sentiment("Avian influenza", dataset.details()).unwrap(),
        67
    );
    assert!(matches!(
        MetricsAggregator::get_impact("swine flu", dataset.details()),
        Err(BriefingError::NoImpactData { .. })
    ));
}

#[tokio::test]
async fn test_dashboard_gating_flow() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_tables(temp_dir.path());
    let dataset = Dataset::load(&config.data).unwrap();
    assert_eq!(dataset.active_outbreaks().len(), 2);

    let mut dashboard = Dashboard::new(
        &config,
        dataset,
        QueuedAssistant::default(),
        ContinentGeocoder,
    );

    assert!(!dashboard.session().comparison_unlocked());
    assert!(dashboard.generate_comparison().await.is_err());

    let briefing = dashboard.generate_country_briefing().await.unwrap();
    assert_eq!(briefing, "- Answer on thread_1");

    let reports = dashboard.extract_news().await.unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].bundle.cases, 120);
    assert_eq!(reports[1].bundle.cases, 45);
    assert_eq!(reports[1].impact, None);
    assert!(dashboard.session().comparison_unlocked());

    let comparison = dashboard.generate_comparison().await.unwrap();
    assert_eq!(comparison, "- Answer on thread_2");
    assert!(dashboard.session().chat_enabled(BriefingKind::Comparison));
}

#[tokio::test]
async fn test_compare_command_runs_full_flow() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_tables(temp_dir.path());
    let dataset = Dataset::load(&config.data).unwrap();
    let mut dashboard = Dashboard::new(
        &config,
        dataset,
        QueuedAssistant::default(),
        ContinentGeocoder,
    );

    run_command(
        &mut dashboard,
        Command::Compare {
            chat: vec!["What is the concern level?".to_string()],
        },
    )
    .await
    .unwrap();

    for kind in [
        BriefingKind::Country,
        BriefingKind::News,
        BriefingKind::Comparison,
    ] {
        assert!(dashboard.session().briefing(kind).is_available());
    }
}

#[tokio::test]
async fn test_missing_table_fails_to_load() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = write_tables(temp_dir.path());
    config.data.details_path = temp_dir.path().join("missing.csv");

    let err = Dataset::load(&config.data).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.csv"));
}
