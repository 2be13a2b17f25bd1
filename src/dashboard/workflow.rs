use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::assistant::{AssistantService, OpenAiAssistantClient};
use crate::cli::Command;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::dashboard::render::{render_session, render_topic_report};
use crate::data::Dataset;
use crate::geo::{Geocoder, NominatimGeocoder};

const HELP: &str = "Commands:
  briefing        generate the weekly country briefing
  chat <message>  ask about the country briefing
  extract         extract metrics from the daily news
  compare         generate the historical comparison
  ask <message>   ask about the historical comparison
  status          show which briefings are available
  help            show this help
  quit            exit";

/// 构建真实的服务客户端并执行命令
pub async fn launch(config: &Config, command: Command) -> Result<()> {
    let service = OpenAiAssistantClient::new(&config.assistant)?;
    let geocoder = NominatimGeocoder::new(&config.geocoder)?;
    let dataset = Dataset::load(&config.data)?;

    let mut dashboard = Dashboard::new(config, dataset, service, geocoder);
    println!("🦠 {}", dashboard.config().title);
    run_command(&mut dashboard, command).await
}

/// 执行单个 CLI 命令；对比命令会先补齐国家简报与新闻提取
pub async fn run_command<A: AssistantService, G: Geocoder>(
    dashboard: &mut Dashboard<A, G>,
    command: Command,
) -> Result<()> {
    match command {
        Command::Briefing { chat } => {
            country_briefing(dashboard).await?;
            for message in chat {
                println!("\n💬 {}", message);
                println!("{}", dashboard.country_chat(&message).await?);
            }
        }
        Command::Extract { .. } => {
            extract(dashboard).await?;
        }
        Command::Compare { chat } => {
            country_briefing(dashboard).await?;
            extract(dashboard).await?;
            comparison(dashboard).await?;
            for message in chat {
                println!("\n💬 {}", message);
                println!("{}", dashboard.comparison_chat(&message).await?);
            }
        }
        Command::Interactive => {
            run_interactive(dashboard, BufReader::new(tokio::io::stdin())).await?;
        }
    }
    Ok(())
}

/// 交互式循环。单个动作失败只打印错误，不退出循环。
pub async fn run_interactive<A, G, R>(dashboard: &mut Dashboard<A, G>, reader: R) -> Result<()>
where
    A: AssistantService,
    G: Geocoder,
    R: AsyncBufRead + Unpin,
{
    println!("{}", HELP);
    let mut lines = reader.lines();

    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (action, argument) = match line.split_once(' ') {
            Some((action, argument)) => (action, argument.trim()),
            None => (line, ""),
        };

        let outcome = match action {
            "" => Ok(()),
            "briefing" => country_briefing(dashboard).await,
            "chat" if !argument.is_empty() => dashboard
                .country_chat(argument)
                .await
                .map(|answer| println!("{}", answer))
                .map_err(Into::into),
            "extract" => extract(dashboard).await,
            "compare" => comparison(dashboard).await,
            "ask" if !argument.is_empty() => dashboard
                .comparison_chat(argument)
                .await
                .map(|answer| println!("{}", answer))
                .map_err(Into::into),
            "status" => {
                println!("{}", render_session(dashboard.session()));
                Ok(())
            }
            "help" => {
                println!("{}", HELP);
                Ok(())
            }
            "quit" | "exit" => break,
            _ => {
                println!("Unknown command: {:?}. Type `help` for the list.", line);
                Ok(())
            }
        };

        if let Err(err) = outcome {
            println!("❌ {}", err);
        }
    }

    println!("👋 Bye");
    Ok(())
}

async fn country_briefing<A: AssistantService, G: Geocoder>(
    dashboard: &mut Dashboard<A, G>,
) -> Result<()> {
    println!("⏳ Generating weekly country briefing...");
    let briefing = dashboard.generate_country_briefing().await?;
    println!("\n📋 Weekly briefing\n{}", briefing);
    Ok(())
}

async fn extract<A: AssistantService, G: Geocoder>(dashboard: &mut Dashboard<A, G>) -> Result<()> {
    println!("⏳ Extracting metrics from the daily news...");
    let reports = dashboard.extract_news().await?;
    for report in &reports {
        println!("\n{}", render_topic_report(report));
    }
    Ok(())
}

async fn comparison<A: AssistantService, G: Geocoder>(
    dashboard: &mut Dashboard<A, G>,
) -> Result<()> {
    println!("⏳ Generating historical comparison...");
    let comparison = dashboard.generate_comparison().await?;
    println!("\n📈 Historical comparison\n{}", comparison);
    Ok(())
}
