//! Client side of the studio: form state, the submit/download actions and a
//! terminal rendering of the view.

pub mod client;
pub mod download;
pub mod view;

use std::path::{Path, PathBuf};

use crate::{
    error::{Result, DOWNLOAD_FAILED_MESSAGE},
    models::{GenerationRequest, ImageStyle},
};

pub use client::{EndpointClient, GenerateApi};

const NO_IMAGE_MESSAGE: &str = "The response did not contain an image";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub prompt: String,
    pub style: Option<ImageStyle>,
    pub loading: bool,
    pub error: Option<String>,
    pub image_url: Option<String>,
}

impl FormState {
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            prompt: Some(self.prompt.clone()),
            style: self.style,
        }
    }

    /// The submit control is disabled while a request is in flight.
    pub fn can_submit(&self) -> bool {
        !self.loading
    }
}

type Observer = Box<dyn Fn(&FormState) + Send + Sync>;

fn notify(observer: Option<&(dyn Fn(&FormState) + Send + Sync)>, state: &FormState) {
    if let Some(observer) = observer {
        observer(state);
    }
}

/// An in-flight submission. Creating it clears the previous outcome and
/// raises `loading`; dropping it lowers `loading` again, whether the request
/// finished, failed or the future was abandoned.
struct PendingSubmission<'a> {
    state: &'a mut FormState,
    observer: Option<&'a (dyn Fn(&FormState) + Send + Sync)>,
}

impl<'a> PendingSubmission<'a> {
    fn begin(
        state: &'a mut FormState,
        observer: Option<&'a (dyn Fn(&FormState) + Send + Sync)>,
    ) -> Self {
        state.error = None;
        state.image_url = None;
        state.loading = true;
        notify(observer, &*state);
        Self { state, observer }
    }

    fn succeed(&mut self, url: String) {
        self.state.image_url = Some(url);
    }

    fn fail(&mut self, message: String) {
        self.state.error = Some(message);
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        self.state.loading = false;
        notify(self.observer, &*self.state);
    }
}

pub struct GenerationForm<A> {
    api: A,
    state: FormState,
    observer: Option<Observer>,
}

impl<A: GenerateApi> GenerationForm<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: FormState::default(),
            observer: None,
        }
    }

    /// Called with a snapshot after every state change, the way a view
    /// re-renders.
    pub fn with_observer(mut self, observer: impl Fn(&FormState) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.state.prompt = prompt.into();
    }

    pub fn set_style(&mut self, style: Option<ImageStyle>) {
        self.state.style = style;
    }

    /// Send the current fields to the endpoint. Exactly one request per call;
    /// `&mut self` keeps a second submission from starting while one is
    /// pending.
    pub async fn submit(&mut self) {
        let request = self.state.to_request();
        let mut pending = PendingSubmission::begin(&mut self.state, self.observer.as_deref());

        match self.api.generate(&request).await {
            Ok(response) => match response.first_url() {
                Some(url) => {
                    log::debug!("Displaying generated image {}", url);
                    pending.succeed(url);
                }
                None => pending.fail(NO_IMAGE_MESSAGE.to_string()),
            },
            Err(e) => {
                log::debug!("Generation failed: {}", e);
                pending.fail(e.to_string());
            }
        }
    }

    /// Save the displayed image into `dir`. Does nothing without a result;
    /// on failure the form's error message is set and `None` returned.
    pub async fn download(&mut self, dir: &Path) -> Option<PathBuf> {
        let url = self.state.image_url.clone()?;

        match self.fetch_and_save(&url, dir).await {
            Ok(path) => {
                log::info!("💾 Image saved to: {}", path.display());
                Some(path)
            }
            Err(e) => {
                log::warn!("Image download failed: {}", e);
                self.state.error = Some(DOWNLOAD_FAILED_MESSAGE.to_string());
                notify(self.observer.as_deref(), &self.state);
                None
            }
        }
    }

    async fn fetch_and_save(&self, url: &str, dir: &Path) -> Result<PathBuf> {
        let bytes = match download::decode_data_url(url) {
            Some(decoded) => decoded?,
            None => self.api.fetch_image(url).await?,
        };
        download::save_image(dir, &bytes).await
    }
}
