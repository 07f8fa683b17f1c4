//! Subcommand handlers: resolve configuration, open the store, run one stage,
//! render its result.

use std::io::Write;

use threadshape_analysis::decomposition::CommandSolver;
use threadshape_analysis::Pipeline;
use threadshape_core::config::ThreadshapeConfig;
use threadshape_core::traits::ArtifactStore;
use threadshape_storage::{open_store, JsonlCorpus};

use crate::error::CliError;
use crate::output;
use crate::GlobalArgs;

struct Context {
    config: ThreadshapeConfig,
    store: Box<dyn ArtifactStore>,
}

impl Context {
    fn open(args: &GlobalArgs) -> Result<Self, CliError> {
        let config = ThreadshapeConfig::load(&args.root, Some(&args.overrides()))?;
        let store = open_store(&config.storage, &args.root)?;
        Ok(Self { config, store })
    }

    fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(&self.config, self.store.as_ref())
    }
}

fn load_corpus(args: &GlobalArgs, command: &'static str) -> Result<JsonlCorpus, CliError> {
    let path = args
        .corpus
        .as_deref()
        .ok_or(CliError::MissingCorpus { command })?;
    Ok(JsonlCorpus::open(path)?)
}

pub fn build_tensor(args: &GlobalArgs, out: &mut impl Write) -> Result<(), CliError> {
    let ctx = Context::open(args)?;
    let corpus = load_corpus(args, "build-tensor")?;
    let build = ctx.pipeline().build_tensor(&corpus, &corpus)?;
    output::tensor_build(out, &build, args.format)
}

pub fn decompose(args: &GlobalArgs, out: &mut impl Write) -> Result<(), CliError> {
    let ctx = Context::open(args)?;
    let solver = CommandSolver::from_config(&ctx.config.decomposition)?;
    let outcome = ctx.pipeline().decompose(&solver)?;
    output::decomposition(out, &outcome, args.format)
}

pub fn summarize(args: &GlobalArgs, out: &mut impl Write) -> Result<(), CliError> {
    let ctx = Context::open(args)?;
    let summary = ctx.pipeline().summarize()?;
    output::summary(out, &summary, args.format)
}

pub fn detailed_examples(args: &GlobalArgs, out: &mut impl Write) -> Result<(), CliError> {
    let ctx = Context::open(args)?;
    let corpus = load_corpus(args, "detailed-examples")?;
    let report = ctx.pipeline().detailed_examples(&corpus)?;
    output::examples(out, &report, args.format)
}

pub fn run(args: &GlobalArgs, force: bool, out: &mut impl Write) -> Result<(), CliError> {
    let ctx = Context::open(args)?;
    let corpus = load_corpus(args, "run")?;
    let solver = CommandSolver::from_config(&ctx.config.decomposition)?;
    let report = ctx.pipeline().run(&corpus, &corpus, &solver, force)?;
    output::run(out, &report, args.format)
}
