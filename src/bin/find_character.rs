//! Looks up Chewbacca in the local `starwars.characters` collection.

use std::process::ExitCode;

use swapi_resolver::database::{with_collection, DocumentStore};
use swapi_resolver::logging::setup_tracing;
use swapi_resolver::DatabaseConfig;

const CHARACTER: &str = "Chewbacca";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    setup_tracing();

    let lookup = with_collection(&DatabaseConfig::default(), |store| async move {
        println!("Connected to MongoDB!");
        store.find_one_by_name(CHARACTER).await
    })
    .await;

    match lookup {
        Ok(Some(document)) => {
            println!("{}", document);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("None");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Lookup failed");
            ExitCode::FAILURE
        }
    }
}
