use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tag_release::config::{self, TaskConfig, TaskOptions};
use tag_release::git::Git2Repository;
use tag_release::release::ReleaseEngine;
use tag_release::{resolver, ui, TagReleaseError};

#[derive(clap::Parser)]
#[command(
    name = "tag-release",
    version,
    about = "Tag the current commit with a semantic version from a metadata file"
)]
struct Args {
    #[arg(help = "Metadata file path, or a literal version if no such file exists")]
    target: Option<String>,

    #[arg(short, long, help = "JSON metadata file holding the version")]
    file: Option<PathBuf>,

    #[arg(short, long, help = "Commit and tag message template (%version% is replaced)")]
    message: Option<String>,

    #[arg(short, long, help = "String prepended to the version to form the tag name")]
    prefix: Option<String>,

    #[arg(long, help = "Don't commit outstanding changes before tagging")]
    no_commit: bool,

    #[arg(short, long, help = "Create an annotated tag carrying the message")]
    annotate: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Enable debug logging")]
    verbose: bool,
}

impl Args {
    fn to_options(&self) -> tag_release::Result<TaskOptions> {
        let mut options = match &self.target {
            Some(target) => TaskOptions::from_shorthand(target)?,
            None => TaskOptions::default(),
        };

        if self.file.is_some() {
            options.file = self.file.clone();
        }
        options.message = self.message.clone();
        options.prefix = self.prefix.clone();
        if self.no_commit {
            options.commit = Some(false);
        }
        if self.annotate {
            options.annotate = Some(true);
        }

        Ok(options)
    }
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if let Err(e) = run(&args) {
        ui::display_error(&format!("{:#}", e));
        let code = e
            .chain()
            .find_map(|cause| cause.downcast_ref::<TagReleaseError>())
            .map_or(1, TagReleaseError::exit_code);
        std::process::exit(code);
    }
}

fn run(args: &Args) -> Result<()> {
    let file_options = config::load_config(args.config.as_deref())?;
    let options = TaskConfig::Options(file_options.merge(args.to_options()?)).normalize()?;

    let release = resolver::resolve(&options)?;

    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let repo = Git2Repository::discover(cwd);
    let engine = ReleaseEngine::new(&repo);

    let plan = engine.plan(&release)?;
    ui::display_plan(&plan);

    if args.dry_run {
        ui::display_status("Dry run: no commit or tag created");
        return Ok(());
    }

    let outcome = engine.execute(plan)?;
    ui::display_outcome(&outcome);

    Ok(())
}
