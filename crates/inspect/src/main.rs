use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use fieldrules_core::config::RuleCatalogConfig;
use fieldrules_core::path::PropertyPathResolver;
use fieldrules_core::validation::ValidatorFinder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod translate;

const DEFAULT_CATALOG: &str = "fieldrules.json";
const PATH_CACHE_LIMIT: usize = 256;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldrules_inspect=info,fieldrules_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [model_type, expression] = args.as_slice() else {
        bail!("usage: fieldrules-inspect <model-type> <expression>");
    };

    let catalog_path = std::env::var("FIELDRULES_CATALOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CATALOG));
    tracing::info!(path = %catalog_path.display(), "Loading rule catalog");

    let loaded = RuleCatalogConfig::from_path(&catalog_path)
        .and_then(|config| config.build())
        .with_context(|| format!("loading {}", catalog_path.display()))?;

    let chain = translate::translate(&loaded.catalog, model_type, expression)?;
    let paths = PropertyPathResolver::with_cache_limit(loaded.catalog, PATH_CACHE_LIMIT);
    let finder = ValidatorFinder::with_resolver(loaded.registry, paths);
    let path = finder.paths().resolve(model_type, &chain)?;
    let rules = finder.find_validators(Some(model_type.as_str()), &path);

    let report = serde_json::json!({
        "model_type": model_type,
        "expression": expression,
        "path": path.dotted(),
        "rules": rules,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
