//! Orchestration of a single generation: validate, optionally enhance the
//! prompt, build the request, call the image model, report the outcome.

use crate::ai::{
    self, GeminiEnhanceClient, GeminiImageClient, ImageGenerationService,
    PromptEnhancementService,
};
use crate::models::{Config, Credentials, GeneratedImage, Session, StatusMessage};
use crate::request;
use crate::status::{self, StatusSink, TracingSink};
use crate::store::{FileStore, Settings};
use crate::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Runs generations against injected services. At most one generation is
/// in flight at a time.
pub struct Studio {
    enhancer: Box<dyn PromptEnhancementService>,
    generator: Box<dyn ImageGenerationService>,
    settings: Settings,
    sink: Box<dyn StatusSink>,
    in_flight: AtomicBool,
}

/// Injectable service bundle used to construct [`Studio`] in tests/harnesses.
pub struct StudioServices {
    pub enhancer: Box<dyn PromptEnhancementService>,
    pub generator: Box<dyn ImageGenerationService>,
    pub settings: Settings,
    pub sink: Box<dyn StatusSink>,
}

/// Clears the in-flight flag when the generation resolves, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Studio {
    pub fn with_services(services: StudioServices) -> Self {
        Self {
            enhancer: services.enhancer,
            generator: services.generator,
            settings: services.settings,
            sink: services.sink,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Construct a studio backed by the preference file and Gemini clients
    /// described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = Settings::new(Box::new(FileStore::open(&config.preferences_path)?));

        // Reuse one HTTP connection pool across both clients.
        let http_client = reqwest::Client::new();

        info!("Models: text={} image={}", config.text_model, config.image_model);
        let enhancer =
            GeminiEnhanceClient::new_with_client(config.text_model.clone(), http_client.clone())
                .with_base_url(config.base_url.clone())
                .with_timeout(config.enhance_timeout);
        let generator = GeminiImageClient::new_with_client(config.image_model.clone(), http_client)
            .with_base_url(config.base_url.clone());

        Ok(Self::with_services(StudioServices {
            enhancer: Box::new(enhancer),
            generator: Box::new(generator),
            settings,
            sink: Box::new(TracingSink),
        }))
    }

    /// Stores `GEMINI_API_KEY` when the store holds no key yet. Returns
    /// whether a key was written.
    pub fn seed_api_key(&self, config: &Config) -> Result<bool> {
        match &config.gemini_api_key {
            Some(key) if self.settings.credentials().is_empty() => {
                info!("Seeding API key from GEMINI_API_KEY");
                self.settings.set_api_key(key)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Generate with enhancement governed by the stored `auto_enhance` flag.
    pub async fn generate(&self, session: &Session) -> Result<GeneratedImage> {
        let auto_enhance = self.settings.preferences().auto_enhance;
        self.generate_with_enhance(session, auto_enhance).await
    }

    /// Generate from a snapshot of `session`.
    ///
    /// Reports `Info` statuses for enhancement (when enabled) and generation,
    /// then exactly one terminal `Success` or `Error`. A call made while
    /// another is in flight fails with [`Error::Busy`] and reports nothing.
    pub async fn generate_with_enhance(
        &self,
        session: &Session,
        auto_enhance: bool,
    ) -> Result<GeneratedImage> {
        let _guard = self.begin()?;
        let snapshot = session.clone();
        let credentials = self.settings.credentials();

        let result = self.run(&snapshot, &credentials, auto_enhance).await;
        match &result {
            Ok(_) => self.sink.report(StatusMessage::success(status::GENERATED)),
            Err(e) => self.sink.report(StatusMessage::error(e.to_string())),
        }
        result
    }

    fn begin(&self) -> Result<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                tracing::warn!("Ignoring generate request: a generation is already running");
                Error::Busy
            })?;
        Ok(InFlight(&self.in_flight))
    }

    async fn run(
        &self,
        session: &Session,
        credentials: &Credentials,
        auto_enhance: bool,
    ) -> Result<GeneratedImage> {
        request::validate(
            credentials,
            session.mode,
            &session.prompt,
            session.image.is_some(),
        )?;

        let prompt = if auto_enhance {
            self.sink.report(StatusMessage::info(status::ENHANCING));
            ai::enhance(self.enhancer.as_ref(), &session.prompt, credentials).await
        } else {
            session.prompt.clone()
        };

        self.sink.report(StatusMessage::info(status::GENERATING));
        let request = request::build(session.mode, &prompt, session.image.as_ref());
        let image_b64 = self.generator.generate(&request, credentials).await?;

        info!("Received generated image ({} base64 chars)", image_b64.len());
        Ok(GeneratedImage { image_b64, prompt })
    }
}
