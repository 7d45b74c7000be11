//! Visual classifier engine.
//!
//! Models load lazily and are cached by name with at most one load in
//! flight per name; concurrent callers wait on the same load. A failed
//! load is remembered for a backoff window so a missing model does not
//! hammer the loader on every call. Inference runs inside the shared
//! worker pool, and input buffers live only for the duration of a call.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};
use crate::pool::WorkerPool;

/// Model used when the caller does not name one.
pub const DEFAULT_MODEL: &str = "forgery-detector-v3";

/// How long a failed load is held before another attempt is allowed.
pub const LOAD_BACKOFF: Duration = Duration::from_secs(30);

/// Input grid dimensions every model receives.
pub const INPUT_WIDTH: usize = 224;
pub const INPUT_HEIGHT: usize = 224;
pub const INPUT_CHANNELS: usize = 3;

// ─── Input tensor ───────────────────────────────────────────────────────────

/// Fixed-shape normalized intensity grid fed to a model.
pub struct Tensor {
    data: Vec<f32>,
}

impl Tensor {
    /// Sample a payload into the model input grid.
    ///
    /// Bytes are stride-sampled across the whole payload and scaled to
    /// [0,1]. The engine contract is the fixed shape and normalization;
    /// a model needing a true pixel decode performs its own.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let len = INPUT_WIDTH * INPUT_HEIGHT * INPUT_CHANNELS;
        let mut data = vec![0.0f32; len];
        if !bytes.is_empty() {
            for (i, slot) in data.iter_mut().enumerate() {
                let src = (i * bytes.len()) / len;
                *slot = f32::from(bytes[src]) / 255.0;
            }
        }
        Self { data }
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mean intensity over the grid.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|&v| f64::from(v)).sum();
        sum / self.data.len() as f64
    }
}

/// Raw model output.
pub struct Prediction {
    /// Probability the document is forged, in [0,1].
    pub forgery_probability: f64,
    /// Authenticity probability where the model emits one directly;
    /// otherwise the engine uses the complement.
    pub authentic_probability: Option<f64>,
}

// ─── Model traits ───────────────────────────────────────────────────────────

/// A loaded visual model.
pub trait VisualModel: Send + Sync {
    /// Version string reported in results.
    fn version(&self) -> &str;

    /// Run inference. Takes the tensor by value so the input buffer is
    /// released when the call returns.
    fn predict(&self, input: Tensor) -> Result<Prediction>;
}

/// Source of models, keyed by name.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, name: &str) -> Result<Arc<dyn VisualModel>>;
}

/// Loader that only knows the builtin reference model.
pub struct BuiltinLoader;

#[async_trait]
impl ModelLoader for BuiltinLoader {
    async fn load(&self, name: &str) -> Result<Arc<dyn VisualModel>> {
        if name == DEFAULT_MODEL {
            Ok(Arc::new(BuiltinDetector))
        } else {
            Err(AnalysisError::ModelLoad {
                model: name.to_string(),
                reason: "unknown model name".to_string(),
            })
        }
    }
}

/// Reference detector standing in for the trained network.
///
/// Flat, off-center intensity distributions (large uniform runs, synthetic
/// padding) push the probability up; entropy-dense content sits near zero.
/// Deterministic per input, so the surrounding machinery exercises
/// realistically without shipping weights.
struct BuiltinDetector;

impl VisualModel for BuiltinDetector {
    fn version(&self) -> &str {
        "v3.2.1"
    }

    fn predict(&self, input: Tensor) -> Result<Prediction> {
        let p = ((input.mean() - 0.5).abs() * 2.0).clamp(0.0, 1.0);
        Ok(Prediction {
            forgery_probability: p,
            authentic_probability: None,
        })
    }
}

// ─── Flags and results ──────────────────────────────────────────────────────

/// Forgery indicators derived from the probability bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierFlag {
    /// Typefaces within the document do not match.
    FontMismatch,
    /// Descriptive metadata shows signs of editing.
    MetadataTampering,
    /// Traces of editing software in the imagery.
    EditingSoftwareTraces,
    /// Regions appear cloned from elsewhere in the document.
    RegionCloning,
}

impl ClassifierFlag {
    /// The forgery probability above which this flag raises.
    pub fn threshold(self) -> f64 {
        match self {
            ClassifierFlag::FontMismatch => 0.5,
            ClassifierFlag::MetadataTampering => 0.6,
            ClassifierFlag::EditingSoftwareTraces => 0.7,
            ClassifierFlag::RegionCloning => 0.8,
        }
    }

    /// Every flag whose band the probability crosses, in band order.
    pub fn raised_by(probability: f64) -> Vec<ClassifierFlag> {
        [
            ClassifierFlag::FontMismatch,
            ClassifierFlag::MetadataTampering,
            ClassifierFlag::EditingSoftwareTraces,
            ClassifierFlag::RegionCloning,
        ]
        .into_iter()
        .filter(|flag| probability > flag.threshold())
        .collect()
    }
}

impl fmt::Display for ClassifierFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClassifierFlag::FontMismatch => "font_mismatch",
            ClassifierFlag::MetadataTampering => "metadata_tampering",
            ClassifierFlag::EditingSoftwareTraces => "editing_software_traces",
            ClassifierFlag::RegionCloning => "region_cloning",
        };
        write!(f, "{}", name)
    }
}

/// Classifier output for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierResult {
    pub forgery_probability: f64,
    pub authenticity_confidence: f64,
    pub flags: Vec<ClassifierFlag>,
    pub model_version: String,
}

// ─── Engine ─────────────────────────────────────────────────────────────────

enum ModelSlot {
    Loading(Arc<Notify>),
    Ready(Arc<dyn VisualModel>),
    Failed { reason: String, until: Instant },
}

/// Lazily-loading, name-keyed classifier engine.
pub struct ClassifierEngine {
    loader: Arc<dyn ModelLoader>,
    pool: WorkerPool,
    default_model: String,
    load_backoff: Duration,
    cache: Mutex<HashMap<String, ModelSlot>>,
}

impl ClassifierEngine {
    /// Engine over the given loader.
    pub fn new(loader: Arc<dyn ModelLoader>, pool: WorkerPool) -> Self {
        Self {
            loader,
            pool,
            default_model: DEFAULT_MODEL.to_string(),
            load_backoff: LOAD_BACKOFF,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Engine over the builtin reference loader.
    pub fn builtin(pool: WorkerPool) -> Self {
        Self::new(Arc::new(BuiltinLoader), pool)
    }

    /// Override the model used by [`classify`](Self::classify).
    pub fn with_default_model(mut self, name: impl Into<String>) -> Self {
        self.default_model = name.into();
        self
    }

    /// Override how long failed loads are cached.
    pub fn with_load_backoff(mut self, backoff: Duration) -> Self {
        self.load_backoff = backoff;
        self
    }

    /// Classify with the default model.
    pub async fn classify(&self, bytes: &[u8]) -> Result<ClassifierResult> {
        self.classify_with(&self.default_model, bytes).await
    }

    /// Classify with a named model.
    pub async fn classify_with(&self, model_name: &str, bytes: &[u8]) -> Result<ClassifierResult> {
        let model = self.resolve(model_name).await?;
        let _permit = self.pool.acquire().await;

        let tensor = Tensor::from_bytes(bytes);
        let prediction = model.predict(tensor)?;

        let probability = prediction.forgery_probability.clamp(0.0, 1.0);
        let confidence = prediction
            .authentic_probability
            .unwrap_or(1.0 - probability)
            .clamp(0.0, 1.0);

        Ok(ClassifierResult {
            forgery_probability: probability,
            authenticity_confidence: confidence,
            flags: ClassifierFlag::raised_by(probability),
            model_version: model.version().to_string(),
        })
    }

    /// Get the cached model, joining or starting a load as needed.
    async fn resolve(&self, name: &str) -> Result<Arc<dyn VisualModel>> {
        enum Next {
            Use(Arc<dyn VisualModel>),
            Refuse(String),
            Wait(Arc<Notify>),
            Load(Arc<Notify>),
        }

        loop {
            let next = {
                let mut cache = self.cache.lock().unwrap();
                match cache.get(name) {
                    Some(ModelSlot::Ready(model)) => Next::Use(model.clone()),
                    Some(ModelSlot::Failed { reason, until }) if Instant::now() < *until => {
                        Next::Refuse(reason.clone())
                    }
                    Some(ModelSlot::Loading(notify)) => Next::Wait(notify.clone()),
                    // Vacant, or a failure whose backoff has elapsed: claim the load
                    _ => {
                        let notify = Arc::new(Notify::new());
                        cache.insert(name.to_string(), ModelSlot::Loading(notify.clone()));
                        Next::Load(notify)
                    }
                }
            };

            match next {
                Next::Use(model) => return Ok(model),
                Next::Refuse(reason) => {
                    return Err(AnalysisError::ModelLoad {
                        model: name.to_string(),
                        reason,
                    })
                }
                Next::Load(notify) => return self.run_load(name, notify).await,
                Next::Wait(notify) => {
                    // Register before re-checking so a settle between the
                    // check and the await cannot be missed
                    let notified = notify.notified();
                    tokio::pin!(notified);
                    notified.as_mut().enable();

                    let still_loading = matches!(
                        self.cache.lock().unwrap().get(name),
                        Some(ModelSlot::Loading(_))
                    );
                    if still_loading {
                        notified.await;
                    }
                }
            }
        }
    }

    async fn run_load(&self, name: &str, notify: Arc<Notify>) -> Result<Arc<dyn VisualModel>> {
        // If this future is dropped mid-load, release the claim so waiters
        // and later callers can retry instead of hanging on a dead slot
        struct Claim<'a> {
            cache: &'a Mutex<HashMap<String, ModelSlot>>,
            name: &'a str,
            notify: &'a Notify,
            settled: bool,
        }
        impl Drop for Claim<'_> {
            fn drop(&mut self) {
                if !self.settled {
                    self.cache.lock().unwrap().remove(self.name);
                }
                self.notify.notify_waiters();
            }
        }

        let mut claim = Claim {
            cache: &self.cache,
            name,
            notify: &notify,
            settled: false,
        };

        debug!(model = name, "loading classifier model");
        let outcome = self.loader.load(name).await;

        let result = match outcome {
            Ok(model) => {
                self.cache
                    .lock()
                    .unwrap()
                    .insert(name.to_string(), ModelSlot::Ready(model.clone()));
                Ok(model)
            }
            Err(err) => {
                let reason = match &err {
                    AnalysisError::ModelLoad { reason, .. } => reason.clone(),
                    other => other.to_string(),
                };
                warn!(model = name, error = %reason, "model load failed");
                self.cache.lock().unwrap().insert(
                    name.to_string(),
                    ModelSlot::Failed {
                        reason: reason.clone(),
                        until: Instant::now() + self.load_backoff,
                    },
                );
                Err(AnalysisError::ModelLoad {
                    model: name.to_string(),
                    reason,
                })
            }
        };

        claim.settled = true;
        drop(claim);
        result
    }
}
