use std::sync::Arc;

use crate::app::Result;
use crate::config::Config;
use crate::controller::{PreviewController, SubmissionController};
use crate::fetcher::{Fetcher, ProxyFetcher};
use crate::i18n::Localizer;
use crate::notifier::ChangeNotifier;
use crate::parser::RssParser;
use crate::poller::Poller;
use crate::validate::UrlValidator;
use crate::view::{Dom, ViewRenderer};

/// Wires every component together.
///
/// Construction order matters and is fixed here: configuration, then the
/// localizer and validator, then the store behind its notifier, then the
/// renderer, and finally the controllers and the poller that drive them.
/// Nothing renders or validates before the localizer exists.
pub struct AppContext {
    pub config: Config,
    pub i18n: Arc<Localizer>,
    pub notifier: Arc<ChangeNotifier>,
    pub renderer: Arc<ViewRenderer>,
    pub submissions: SubmissionController,
    pub preview: PreviewController,
    pub poller: Arc<Poller>,
}

impl AppContext {
    pub fn new(config: Config, dom: Arc<dyn Dom + Send + Sync>) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(ProxyFetcher::new(&config.proxy)?);
        Self::with_fetcher(config, fetcher, dom)
    }

    pub fn with_fetcher(
        config: Config,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        dom: Arc<dyn Dom + Send + Sync>,
    ) -> Result<Self> {
        let i18n = Arc::new(Localizer::new(&config.locale.language)?);
        let validator = UrlValidator::new();
        let parser = RssParser::new();

        let notifier = Arc::new(ChangeNotifier::default());
        let renderer = Arc::new(ViewRenderer::new(notifier.clone(), i18n.clone(), dom));

        let submissions = SubmissionController::new(
            validator,
            parser.clone(),
            notifier.clone(),
            fetcher.clone(),
            renderer.clone(),
        );
        let preview = PreviewController::new(notifier.clone());
        let poller = Arc::new(Poller::new(
            notifier.clone(),
            fetcher,
            parser,
            config.poller.clone(),
        ));

        Ok(Self {
            config,
            i18n,
            notifier,
            renderer,
            submissions,
            preview,
            poller,
        })
    }
}
