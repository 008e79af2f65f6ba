use std::io;

use chrono::NaiveDate;
use smartis::{MetricCode, Payload, ProjectCode, SmartisClientBuilder, SmartisError};

fn required_env(key: &str) -> Result<String, io::Error> {
    std::env::var(key).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{key} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let project = ProjectCode::new(required_env("SMARTIS_PROJECT")?)?;
    let metrics = required_env("SMARTIS_METRICS")?
        .split(',')
        .map(MetricCode::new)
        .collect::<Result<Vec<_>, _>>()?;
    let from = NaiveDate::parse_from_str(&required_env("SMARTIS_FROM")?, "%Y-%m-%d")?;
    let to = NaiveDate::parse_from_str(&required_env("SMARTIS_TO")?, "%Y-%m-%d")?;

    let client = SmartisClientBuilder::from_env()?.build()?;
    let payload = Payload::new(project, metrics, from, to)?;

    for mut report in client.get_report(&payload).await? {
        match client.resolve_column_names(&mut report).await {
            Ok(()) | Err(SmartisError::MissingCredential) => {}
            Err(err) => return Err(err.into()),
        }
        report.index_columns();

        println!("== {} ({} rows)", report.metric(), report.rows().len());
        for row in report.rows() {
            let cells = row
                .cells()
                .iter()
                .map(|cell| {
                    let label = if cell.name().is_empty() {
                        cell.column_id()
                    } else {
                        cell.name()
                    };
                    format!("{label}={:?}", cell.value())
                })
                .collect::<Vec<_>>();
            println!("{}", cells.join(", "));
        }
    }

    Ok(())
}
