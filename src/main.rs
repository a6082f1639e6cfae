use clap::{Parser, Subcommand};
use kavach::knowledge::{KnowledgeBase, Section};
use kavach::records::Gender;
use kavach::{
    AppError, CaptureHandle, CheckupKind, CheckupRecord, Configuration, RiskLevel, ScreeningSuite,
    UserProfile,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "kavach")]
#[command(about = "Offline health screening from photos and recordings", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one screening on a captured photo or recording
    Analyze {
        /// anemia, skin, respiratory or dehydration
        kind: CheckupKind,

        /// Path or file:// URI of the capture
        uri: String,

        /// Owner of the checkup, stored on the record
        #[arg(long)]
        user_id: Option<i64>,

        /// Also print the checkup record for the local store
        #[arg(long)]
        record: bool,
    },
    /// Run several screenings concurrently
    Screen {
        #[arg(long)]
        anemia: Option<String>,
        #[arg(long)]
        skin: Option<String>,
        #[arg(long)]
        respiratory: Option<String>,
        #[arg(long)]
        dehydration: Option<String>,
    },
    /// Browse the offline knowledge base
    Learn {
        /// Guide id; lists all guides when omitted
        id: Option<String>,
    },
    /// Create a local profile
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        pin: String,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<Gender>,
    },
}

fn init_logging(configuration: &Configuration) {
    let level = configuration
        .log_level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let configuration = Configuration::load(cli.config.as_deref())?;
    init_logging(&configuration);

    match cli.command {
        Commands::Analyze {
            kind,
            uri,
            user_id,
            record,
        } => {
            let suite = ScreeningSuite::from_config(&configuration);
            let capture = CaptureHandle::new(uri.clone(), kind.media());
            let result = suite.analyze(kind, capture).await;

            let guide = (result.risk() > RiskLevel::Low)
                .then(|| KnowledgeBase::offline().related_to(kind).map(|g| g.id))
                .flatten();
            let record = if record {
                Some(CheckupRecord::from_result(user_id, &uri, &result)?)
            } else {
                None
            };

            let output = json!({
                "result": result,
                "record": record,
                "related_guide": guide,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Screen {
            anemia,
            skin,
            respiratory,
            dehydration,
        } => {
            let requests: Vec<(CheckupKind, CaptureHandle)> = [
                (CheckupKind::Anemia, anemia),
                (CheckupKind::Skin, skin),
                (CheckupKind::Respiratory, respiratory),
                (CheckupKind::Dehydration, dehydration),
            ]
            .into_iter()
            .filter_map(|(kind, uri)| uri.map(|uri| (kind, CaptureHandle::new(uri, kind.media()))))
            .collect();

            if requests.is_empty() {
                return Err(AppError::EmptyScreening);
            }

            let suite = ScreeningSuite::from_config(&configuration);
            let results = suite.analyze_batch(requests).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Learn { id } => {
            let kb = KnowledgeBase::offline();
            match id {
                Some(id) => {
                    let guide = kb.guide(&id).ok_or(AppError::UnknownGuide(id))?;
                    println!("{}\n{}\n", guide.title, guide.description);
                    for (n, step) in guide.steps.iter().enumerate() {
                        println!("{:>2}. {}", n + 1, step);
                    }
                }
                None => {
                    for section in [Section::EmergencyProcedures, Section::DailyHealth] {
                        println!("{}", section.title());
                        for guide in kb.section(section) {
                            println!("  {:<12} {}", guide.id, guide.title);
                        }
                    }
                }
            }
        }
        Commands::Register {
            name,
            pin,
            age,
            gender,
        } => {
            let mut profile = UserProfile::register(&name, &pin)?;
            if let Some(age) = age {
                profile = profile.with_age(age);
            }
            if let Some(gender) = gender {
                profile = profile.with_gender(gender);
            }
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
    }

    Ok(())
}
