//! Runtime-selected scaling model.
//!
//! [`ScalingModel`] owns at most one fitted scaler, chosen by a [`ScalerType`]
//! tag, and forwards `transform` / `inverse_transform` to it. The tag is
//! usually set from user input (a command-line option or a config file), so
//! the choice happens at runtime rather than through generics.
//!
//! ```text
//! ScalerType ──from_config──▶ UnfittedScaler ──fit──▶ FittedScaler ──▶ ScalingModel slot
//! ```
//!
//! # Example
//! ```
//! use scaling_rs::backend::{CpuBackend, Tensor2D};
//! use scaling_rs::preprocessing::{ScalerType, ScalingModel};
//!
//! let mut model = ScalingModel::<CpuBackend>::new(0, 1, 1e-6)
//!     .with_scaler_type(ScalerType::MinMaxScaler);
//! model.fit(&Tensor2D::from_column(&[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
//!
//! let scaled = model.transform(&Tensor2D::from_column(&[1.0, 3.0, 5.0])).unwrap();
//! assert_eq!(scaled.to_vec(), vec![0.0, 0.5, 1.0]);
//! ```

use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::scaling::{
    FittedMaxAbsScaler, FittedMeanNormalization, FittedMinMaxScaler, FittedPcaWhitening,
    FittedStandardScaler, FittedZcaWhitening, MaxAbsScaler, MaxAbsScalerParams,
    MeanNormalization, MeanNormalizationParams, MinMaxScaler, MinMaxScalerParams, PcaWhitening,
    PcaWhiteningParams, StandardScaler, StandardScalerParams, ZcaWhitening, ZcaWhiteningParams,
    DEFAULT_EPSILON,
};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag selecting which scaler a [`ScalingModel`] fits.
///
/// `None` is the neutral tag of a freshly constructed model; fitting with it
/// is an error. The integer codes (`0..=6`) follow declaration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalerType {
    /// No scaler selected.
    #[default]
    None,
    /// Z-score normalization.
    StandardScaler,
    /// Scale into `[min_value, max_value]`.
    MinMaxScaler,
    /// Center on the mean, divide by the range.
    MeanNormalization,
    /// Divide by the maximum absolute value.
    MaxAbsScaler,
    /// PCA whitening with `epsilon` regularization.
    PcaWhitening,
    /// ZCA whitening with `epsilon` regularization.
    ZcaWhitening,
}

impl ScalerType {
    /// Every selectable scaler, in tag order.
    pub const ALL: [ScalerType; 6] = [
        ScalerType::StandardScaler,
        ScalerType::MinMaxScaler,
        ScalerType::MeanNormalization,
        ScalerType::MaxAbsScaler,
        ScalerType::PcaWhitening,
        ScalerType::ZcaWhitening,
    ];

    /// Snake-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            ScalerType::None => "none",
            ScalerType::StandardScaler => "standard_scaler",
            ScalerType::MinMaxScaler => "min_max_scaler",
            ScalerType::MeanNormalization => "mean_normalization",
            ScalerType::MaxAbsScaler => "max_abs_scaler",
            ScalerType::PcaWhitening => "pca_whitening",
            ScalerType::ZcaWhitening => "zca_whitening",
        }
    }
}

impl fmt::Display for ScalerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalerType {
    type Err = PreprocessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalerType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| PreprocessingError::UnrecognizedScaler(s.to_string()))
    }
}

impl TryFrom<i32> for ScalerType {
    type Error = PreprocessingError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ScalerType::None),
            1..=6 => Ok(ScalerType::ALL[(code - 1) as usize]),
            _ => Err(PreprocessingError::UnrecognizedScaler(format!(
                "tag {}",
                code
            ))),
        }
    }
}

impl From<ScalerType> for i32 {
    fn from(tag: ScalerType) -> Self {
        tag as i32
    }
}

/// Hyperparameters handed to the scaler a [`ScalingModel`] builds.
///
/// `min_value`/`max_value` are only read by the min-max scaler, `epsilon`
/// only by the whitening scalers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalingModelConfig {
    /// Lower bound of the min-max target range.
    pub min_value: i32,
    /// Upper bound of the min-max target range.
    pub max_value: i32,
    /// Eigenvalue regularization for PCA/ZCA whitening.
    pub epsilon: f64,
}

impl Default for ScalingModelConfig {
    fn default() -> Self {
        Self {
            min_value: 0,
            max_value: 1,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl ScalingModelConfig {
    /// Create a config from explicit values.
    pub fn new(min_value: i32, max_value: i32, epsilon: f64) -> Self {
        Self {
            min_value,
            max_value,
            epsilon,
        }
    }

    /// Set the min-max target range.
    pub fn with_range(mut self, min_value: i32, max_value: i32) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    /// Set the whitening regularization.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

/// Unfitted scaler selected at runtime.
#[derive(Clone, Debug)]
pub enum UnfittedScaler<B: Backend> {
    StandardScaler(StandardScaler<B>),
    MinMaxScaler(MinMaxScaler<B>),
    MeanNormalization(MeanNormalization<B>),
    MaxAbsScaler(MaxAbsScaler<B>),
    PcaWhitening(PcaWhitening<B>),
    ZcaWhitening(ZcaWhitening<B>),
}

impl<B: Backend> UnfittedScaler<B> {
    /// Builds the scaler named by `scaler_type`, configured from `config`.
    ///
    /// # Errors
    /// [`PreprocessingError::UnrecognizedScaler`] for [`ScalerType::None`].
    pub fn from_config(
        scaler_type: ScalerType,
        config: &ScalingModelConfig,
    ) -> Result<Self, PreprocessingError> {
        Ok(match scaler_type {
            ScalerType::None => {
                return Err(PreprocessingError::UnrecognizedScaler(
                    "no scaler type selected".to_string(),
                ))
            }
            ScalerType::StandardScaler => UnfittedScaler::StandardScaler(StandardScaler::new()),
            ScalerType::MinMaxScaler => UnfittedScaler::MinMaxScaler(
                MinMaxScaler::new()
                    .with_range(f64::from(config.min_value), f64::from(config.max_value)),
            ),
            ScalerType::MeanNormalization => {
                UnfittedScaler::MeanNormalization(MeanNormalization::new())
            }
            ScalerType::MaxAbsScaler => UnfittedScaler::MaxAbsScaler(MaxAbsScaler::new()),
            ScalerType::PcaWhitening => {
                UnfittedScaler::PcaWhitening(PcaWhitening::new().with_epsilon(config.epsilon))
            }
            ScalerType::ZcaWhitening => {
                UnfittedScaler::ZcaWhitening(ZcaWhitening::new().with_epsilon(config.epsilon))
            }
        })
    }

    /// Tag of the wrapped scaler.
    pub fn scaler_type(&self) -> ScalerType {
        match self {
            UnfittedScaler::StandardScaler(_) => ScalerType::StandardScaler,
            UnfittedScaler::MinMaxScaler(_) => ScalerType::MinMaxScaler,
            UnfittedScaler::MeanNormalization(_) => ScalerType::MeanNormalization,
            UnfittedScaler::MaxAbsScaler(_) => ScalerType::MaxAbsScaler,
            UnfittedScaler::PcaWhitening(_) => ScalerType::PcaWhitening,
            UnfittedScaler::ZcaWhitening(_) => ScalerType::ZcaWhitening,
        }
    }
}

impl<B: Backend> Transformer<B> for UnfittedScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = ScalerParams;
    type Fitted = FittedScaler<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        match self {
            UnfittedScaler::StandardScaler(t) => t.fit(data).map(FittedScaler::StandardScaler),
            UnfittedScaler::MinMaxScaler(t) => t.fit(data).map(FittedScaler::MinMaxScaler),
            UnfittedScaler::MeanNormalization(t) => {
                t.fit(data).map(FittedScaler::MeanNormalization)
            }
            UnfittedScaler::MaxAbsScaler(t) => t.fit(data).map(FittedScaler::MaxAbsScaler),
            UnfittedScaler::PcaWhitening(t) => t.fit(data).map(FittedScaler::PcaWhitening),
            UnfittedScaler::ZcaWhitening(t) => t.fit(data).map(FittedScaler::ZcaWhitening),
        }
    }
}

/// Fitted scaler selected at runtime.
#[derive(Clone, Debug)]
pub enum FittedScaler<B: Backend> {
    StandardScaler(FittedStandardScaler<B>),
    MinMaxScaler(FittedMinMaxScaler<B>),
    MeanNormalization(FittedMeanNormalization<B>),
    MaxAbsScaler(FittedMaxAbsScaler<B>),
    PcaWhitening(FittedPcaWhitening<B>),
    ZcaWhitening(FittedZcaWhitening<B>),
}

impl<B: Backend> FittedScaler<B> {
    /// Tag of the wrapped scaler.
    pub fn scaler_type(&self) -> ScalerType {
        match self {
            FittedScaler::StandardScaler(_) => ScalerType::StandardScaler,
            FittedScaler::MinMaxScaler(_) => ScalerType::MinMaxScaler,
            FittedScaler::MeanNormalization(_) => ScalerType::MeanNormalization,
            FittedScaler::MaxAbsScaler(_) => ScalerType::MaxAbsScaler,
            FittedScaler::PcaWhitening(_) => ScalerType::PcaWhitening,
            FittedScaler::ZcaWhitening(_) => ScalerType::ZcaWhitening,
        }
    }
}

/// Serializable parameters of any fitted scaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScalerParams {
    StandardScaler(StandardScalerParams),
    MinMaxScaler(MinMaxScalerParams),
    MeanNormalization(MeanNormalizationParams),
    MaxAbsScaler(MaxAbsScalerParams),
    PcaWhitening(PcaWhiteningParams),
    ZcaWhitening(ZcaWhiteningParams),
}

impl ScalerParams {
    /// Tag of the scaler these params belong to.
    pub fn scaler_type(&self) -> ScalerType {
        match self {
            ScalerParams::StandardScaler(_) => ScalerType::StandardScaler,
            ScalerParams::MinMaxScaler(_) => ScalerType::MinMaxScaler,
            ScalerParams::MeanNormalization(_) => ScalerType::MeanNormalization,
            ScalerParams::MaxAbsScaler(_) => ScalerType::MaxAbsScaler,
            ScalerParams::PcaWhitening(_) => ScalerType::PcaWhitening,
            ScalerParams::ZcaWhitening(_) => ScalerType::ZcaWhitening,
        }
    }
}

impl<B: Backend> FittedTransformer<B> for FittedScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = ScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        match self {
            FittedScaler::StandardScaler(t) => t.transform(data),
            FittedScaler::MinMaxScaler(t) => t.transform(data),
            FittedScaler::MeanNormalization(t) => t.transform(data),
            FittedScaler::MaxAbsScaler(t) => t.transform(data),
            FittedScaler::PcaWhitening(t) => t.transform(data),
            FittedScaler::ZcaWhitening(t) => t.transform(data),
        }
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        match self {
            FittedScaler::StandardScaler(t) => t.inverse_transform(data),
            FittedScaler::MinMaxScaler(t) => t.inverse_transform(data),
            FittedScaler::MeanNormalization(t) => t.inverse_transform(data),
            FittedScaler::MaxAbsScaler(t) => t.inverse_transform(data),
            FittedScaler::PcaWhitening(t) => t.inverse_transform(data),
            FittedScaler::ZcaWhitening(t) => t.inverse_transform(data),
        }
    }

    fn extract_params(&self) -> Self::Params {
        match self {
            FittedScaler::StandardScaler(t) => ScalerParams::StandardScaler(t.extract_params()),
            FittedScaler::MinMaxScaler(t) => ScalerParams::MinMaxScaler(t.extract_params()),
            FittedScaler::MeanNormalization(t) => {
                ScalerParams::MeanNormalization(t.extract_params())
            }
            FittedScaler::MaxAbsScaler(t) => ScalerParams::MaxAbsScaler(t.extract_params()),
            FittedScaler::PcaWhitening(t) => ScalerParams::PcaWhitening(t.extract_params()),
            FittedScaler::ZcaWhitening(t) => ScalerParams::ZcaWhitening(t.extract_params()),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        Ok(match params {
            ScalerParams::StandardScaler(p) => {
                FittedScaler::StandardScaler(FittedStandardScaler::from_params(p)?)
            }
            ScalerParams::MinMaxScaler(p) => {
                FittedScaler::MinMaxScaler(FittedMinMaxScaler::from_params(p)?)
            }
            ScalerParams::MeanNormalization(p) => {
                FittedScaler::MeanNormalization(FittedMeanNormalization::from_params(p)?)
            }
            ScalerParams::MaxAbsScaler(p) => {
                FittedScaler::MaxAbsScaler(FittedMaxAbsScaler::from_params(p)?)
            }
            ScalerParams::PcaWhitening(p) => {
                FittedScaler::PcaWhitening(FittedPcaWhitening::from_params(p)?)
            }
            ScalerParams::ZcaWhitening(p) => {
                FittedScaler::ZcaWhitening(FittedZcaWhitening::from_params(p)?)
            }
        })
    }

    fn n_features_in(&self) -> usize {
        match self {
            FittedScaler::StandardScaler(t) => t.n_features_in(),
            FittedScaler::MinMaxScaler(t) => t.n_features_in(),
            FittedScaler::MeanNormalization(t) => t.n_features_in(),
            FittedScaler::MaxAbsScaler(t) => t.n_features_in(),
            FittedScaler::PcaWhitening(t) => t.n_features_in(),
            FittedScaler::ZcaWhitening(t) => t.n_features_in(),
        }
    }
}

/// Serializable state of a [`ScalingModel`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalingModelParams {
    /// Selected scaler.
    pub scaler_type: ScalerType,
    /// Lower bound of the min-max target range.
    pub min_value: i32,
    /// Upper bound of the min-max target range.
    pub max_value: i32,
    /// Whitening regularization.
    pub epsilon: f64,
    /// Learned parameters of the fitted scaler, if any.
    pub scaler: Option<ScalerParams>,
}

/// Model that owns at most one fitted scaler, selected by a [`ScalerType`].
///
/// - `fit` is the only operation that creates or replaces the fitted scaler.
/// - `transform` / `inverse_transform` fail with
///   [`PreprocessingError::NotFitted`] until a scaler matching the current
///   tag has been fitted.
/// - `Clone` is a deep copy; `std::mem::take` moves the fitted scaler out and
///   resets the source to [`ScalingModel::default`].
#[derive(Clone, Debug)]
pub struct ScalingModel<B: Backend> {
    scaler_type: ScalerType,
    config: ScalingModelConfig,
    scaler: Option<FittedScaler<B>>,
}

impl<B: Backend> Default for ScalingModel<B> {
    fn default() -> Self {
        Self::with_config(ScalingModelConfig::default())
    }
}

impl<B: Backend> ScalingModel<B> {
    /// Create an unfitted model with no scaler selected.
    pub fn new(min_value: i32, max_value: i32, epsilon: f64) -> Self {
        Self::with_config(ScalingModelConfig::new(min_value, max_value, epsilon))
    }

    /// Create an unfitted model from a config.
    pub fn with_config(config: ScalingModelConfig) -> Self {
        Self {
            scaler_type: ScalerType::None,
            config,
            scaler: None,
        }
    }

    /// Select the scaler the next [`fit`](Self::fit) builds.
    pub fn with_scaler_type(mut self, scaler_type: ScalerType) -> Self {
        self.scaler_type = scaler_type;
        self
    }

    /// Select the scaler the next [`fit`](Self::fit) builds.
    ///
    /// An already fitted scaler of another kind stays in place but is no
    /// longer used; `transform` reports `NotFitted` until the model is refit.
    pub fn set_scaler_type(&mut self, scaler_type: ScalerType) {
        self.scaler_type = scaler_type;
    }

    /// Selected scaler.
    pub fn scaler_type(&self) -> ScalerType {
        self.scaler_type
    }

    /// Hyperparameters used by the next fit.
    pub fn config(&self) -> &ScalingModelConfig {
        &self.config
    }

    /// Lower bound of the min-max target range.
    pub fn min_value(&self) -> i32 {
        self.config.min_value
    }

    /// Upper bound of the min-max target range.
    pub fn max_value(&self) -> i32 {
        self.config.max_value
    }

    /// Whitening regularization.
    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    /// Fits a fresh scaler of the selected type on `data`, replacing any
    /// previously fitted scaler.
    ///
    /// On error the model is left exactly as it was.
    ///
    /// # Errors
    /// - [`PreprocessingError::UnrecognizedScaler`] if no scaler is selected.
    /// - Any error of the selected scaler's own fit.
    pub fn fit(&mut self, data: &Tensor2D<B>) -> Result<(), PreprocessingError> {
        let unfitted = UnfittedScaler::from_config(self.scaler_type, &self.config)?;
        let fitted = unfitted.fit(data)?;

        let (rows, cols) = data.shape();
        match self.scaler.replace(fitted) {
            Some(previous) => log::debug!(
                "ScalingModel: replaced {} with {} fitted on {}x{}",
                previous.scaler_type(),
                self.scaler_type,
                rows,
                cols
            ),
            None => log::debug!(
                "ScalingModel: fitted {} on {}x{}",
                self.scaler_type,
                rows,
                cols
            ),
        }
        Ok(())
    }

    /// Fits and transforms `data` in one step.
    pub fn fit_transform(&mut self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        self.fit(data)?;
        self.transform(data)
    }

    /// Scales `data` with the fitted scaler.
    ///
    /// # Errors
    /// [`PreprocessingError::NotFitted`] if no scaler matching the selected
    /// type has been fitted, otherwise any error of the scaler's transform.
    pub fn transform(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        self.active()?.transform(data)
    }

    /// Maps scaled data back to the original feature space.
    ///
    /// # Errors
    /// Same as [`transform`](Self::transform).
    pub fn inverse_transform(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        self.active()?.inverse_transform(data)
    }

    /// Returns `true` if a scaler matching the selected type is fitted.
    pub fn is_fitted(&self) -> bool {
        self.active().is_ok()
    }

    /// The fitted scaler, if it matches the selected type.
    pub fn fitted_scaler(&self) -> Option<&FittedScaler<B>> {
        self.active().ok()
    }

    /// Number of features the fitted scaler expects.
    pub fn n_features_in(&self) -> Option<usize> {
        self.fitted_scaler().map(|scaler| scaler.n_features_in())
    }

    fn active(&self) -> Result<&FittedScaler<B>, PreprocessingError> {
        match &self.scaler {
            Some(scaler) if scaler.scaler_type() == self.scaler_type => Ok(scaler),
            Some(scaler) => Err(PreprocessingError::NotFitted(format!(
                "{} is selected but the fitted scaler is {}",
                self.scaler_type,
                scaler.scaler_type()
            ))),
            None => Err(PreprocessingError::NotFitted(format!(
                "{} has not been fitted",
                self.scaler_type
            ))),
        }
    }

    /// Exports the tag, config and fitted parameters.
    pub fn extract_params(&self) -> ScalingModelParams {
        ScalingModelParams {
            scaler_type: self.scaler_type,
            min_value: self.config.min_value,
            max_value: self.config.max_value,
            epsilon: self.config.epsilon,
            scaler: self.scaler.as_ref().map(|scaler| scaler.extract_params()),
        }
    }

    /// Rebuilds a model from exported params.
    pub fn from_params(params: ScalingModelParams) -> Result<Self, PreprocessingError> {
        let scaler = params
            .scaler
            .map(FittedScaler::<B>::from_params)
            .transpose()?;

        Ok(Self {
            scaler_type: params.scaler_type,
            config: ScalingModelConfig::new(params.min_value, params.max_value, params.epsilon),
            scaler,
        })
    }

    /// Writes the model to `path` (bincode).
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), PreprocessingError> {
        let bytes = self.extract_params().to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Reads a model written by [`save_to_file`](Self::save_to_file).
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError> {
        let bytes = std::fs::read(path)?;
        Self::from_params(ScalingModelParams::from_bytes(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn create_test_data() -> Tensor2D<CpuBackend> {
        Tensor2D::new(
            vec![
                1.0, 10.0, -3.0, //
                2.0, 14.0, -1.0, //
                4.0, 13.0, 0.5, //
                3.0, 20.0, 2.0, //
                6.0, 18.0, -2.5,
            ],
            5,
            3,
        )
    }

    fn fitted_model(scaler_type: ScalerType) -> ScalingModel<CpuBackend> {
        let mut model = ScalingModel::<CpuBackend>::default().with_scaler_type(scaler_type);
        model.fit(&create_test_data()).unwrap();
        model
    }

    fn assert_close(a: &[f64], b: &[f64], tol: f64) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            assert!((x - y).abs() < tol, "index {}: {} vs {}", i, x, y);
        }
    }

    #[test]
    fn test_scaler_type_codes() {
        assert_eq!(ScalerType::try_from(0).unwrap(), ScalerType::None);
        for (i, tag) in ScalerType::ALL.iter().enumerate() {
            let code = i32::from(*tag);
            assert_eq!(code, i as i32 + 1);
            assert_eq!(ScalerType::try_from(code).unwrap(), *tag);
        }
        for code in [-1, 7, 42] {
            assert!(matches!(
                ScalerType::try_from(code),
                Err(PreprocessingError::UnrecognizedScaler(_))
            ));
        }
    }

    #[test]
    fn test_scaler_type_names() {
        for tag in ScalerType::ALL {
            assert_eq!(tag.to_string().parse::<ScalerType>().unwrap(), tag);
        }
        assert_eq!(
            "zca_whitening".parse::<ScalerType>().unwrap(),
            ScalerType::ZcaWhitening
        );
        assert!("none".parse::<ScalerType>().is_err());
        assert!("robust_scaler".parse::<ScalerType>().is_err());
    }

    #[test]
    fn test_new_model_is_unfitted() {
        let model = ScalingModel::<CpuBackend>::new(-1, 1, 1e-3);
        assert_eq!(model.scaler_type(), ScalerType::None);
        assert_eq!(model.min_value(), -1);
        assert_eq!(model.max_value(), 1);
        assert_eq!(model.epsilon(), 1e-3);
        assert!(!model.is_fitted());
        assert!(model.n_features_in().is_none());
    }

    #[test]
    fn test_round_trip_all_scalers() {
        let data = create_test_data();
        for tag in ScalerType::ALL {
            let model = fitted_model(tag);
            assert!(model.is_fitted());
            assert_eq!(model.n_features_in(), Some(3));
            assert_eq!(model.fitted_scaler().unwrap().scaler_type(), tag);

            let scaled = model.transform(&data).unwrap();
            assert_eq!(scaled.shape(), data.shape());
            let restored = model.inverse_transform(&scaled).unwrap();
            assert_close(&restored.to_vec(), &data.to_vec(), 1e-9);
        }
    }

    #[test]
    fn test_min_max_scenario() {
        let mut model = ScalingModel::<CpuBackend>::new(0, 1, 1e-6);
        model.set_scaler_type(ScalerType::MinMaxScaler);
        model
            .fit(&Tensor2D::from_column(&[1.0, 2.0, 3.0, 4.0, 5.0]))
            .unwrap();

        match model.fitted_scaler() {
            Some(FittedScaler::MinMaxScaler(scaler)) => {
                assert_eq!(scaler.min().to_vec(), vec![1.0]);
                assert_eq!(scaler.max().to_vec(), vec![5.0]);
            }
            other => panic!("expected a min-max scaler, got {:?}", other),
        }

        let scaled = model
            .transform(&Tensor2D::from_column(&[1.0, 3.0, 5.0]))
            .unwrap();
        assert_eq!(scaled.to_vec(), vec![0.0, 0.5, 1.0]);

        let restored = model
            .inverse_transform(&Tensor2D::from_column(&[0.0, 0.5, 1.0]))
            .unwrap();
        assert_eq!(restored.to_vec(), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_min_max_uses_model_range() {
        let mut model = ScalingModel::<CpuBackend>::new(-5, 5, 0.0)
            .with_scaler_type(ScalerType::MinMaxScaler);
        let scaled = model
            .fit_transform(&Tensor2D::from_column(&[0.0, 1.0, 2.0]))
            .unwrap();
        assert_eq!(scaled.to_vec(), vec![-5.0, 0.0, 5.0]);
    }

    #[test]
    fn test_whitening_uses_model_epsilon() {
        let mut model = ScalingModel::<CpuBackend>::with_config(
            ScalingModelConfig::default().with_epsilon(0.25),
        )
        .with_scaler_type(ScalerType::PcaWhitening);
        model.fit(&create_test_data()).unwrap();

        match model.fitted_scaler() {
            Some(FittedScaler::PcaWhitening(scaler)) => assert_eq!(scaler.epsilon(), 0.25),
            other => panic!("expected PCA whitening, got {:?}", other),
        }
    }

    #[test]
    fn test_transform_before_fit_is_not_fitted() {
        let data = create_test_data();
        for tag in ScalerType::ALL {
            let model = ScalingModel::<CpuBackend>::default().with_scaler_type(tag);
            assert!(matches!(
                model.transform(&data),
                Err(PreprocessingError::NotFitted(_))
            ));
            assert!(matches!(
                model.inverse_transform(&data),
                Err(PreprocessingError::NotFitted(_))
            ));
        }
    }

    #[test]
    fn test_fit_without_scaler_type_fails() {
        let mut model = fitted_model(ScalerType::StandardScaler);
        let before = model.extract_params();

        model.set_scaler_type(ScalerType::None);
        assert!(matches!(
            model.fit(&create_test_data()),
            Err(PreprocessingError::UnrecognizedScaler(_))
        ));

        model.set_scaler_type(ScalerType::StandardScaler);
        assert_eq!(model.extract_params(), before);
    }

    #[test]
    fn test_failed_fit_keeps_previous_scaler() {
        let mut model = fitted_model(ScalerType::MaxAbsScaler);
        let before = model.transform(&create_test_data()).unwrap().to_vec();

        let bad = Tensor2D::<CpuBackend>::new(vec![1.0, f64::NAN, 2.0], 1, 3);
        assert!(matches!(
            model.fit(&bad),
            Err(PreprocessingError::MissingValues(_))
        ));
        assert_eq!(model.transform(&create_test_data()).unwrap().to_vec(), before);
    }

    #[test]
    fn test_invalid_range_propagates() {
        let mut model =
            ScalingModel::<CpuBackend>::new(3, 3, 0.0).with_scaler_type(ScalerType::MinMaxScaler);
        assert!(matches!(
            model.fit(&create_test_data()),
            Err(PreprocessingError::InvalidParameter(_))
        ));
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_switching_type_needs_refit() {
        let data = create_test_data();
        let mut model = fitted_model(ScalerType::StandardScaler);

        model.set_scaler_type(ScalerType::MeanNormalization);
        assert!(!model.is_fitted());
        assert!(matches!(
            model.transform(&data),
            Err(PreprocessingError::NotFitted(_))
        ));

        model.fit(&data).unwrap();
        let params = model.extract_params();
        assert!(matches!(
            params.scaler,
            Some(ScalerParams::MeanNormalization(_))
        ));
    }

    #[test]
    fn test_clone_is_independent() {
        let data = create_test_data();
        let original = fitted_model(ScalerType::StandardScaler);
        let mut copy = original.clone();

        let expected = original.transform(&data).unwrap().to_vec();
        assert_eq!(copy.transform(&data).unwrap().to_vec(), expected);

        copy.fit(&Tensor2D::new(vec![0.0; 6], 2, 3)).unwrap();
        assert_ne!(copy.transform(&data).unwrap().to_vec(), expected);
        assert_eq!(original.transform(&data).unwrap().to_vec(), expected);
    }

    #[test]
    fn test_take_resets_source() {
        let data = create_test_data();
        let mut source = ScalingModel::<CpuBackend>::new(2, 8, 1e-2)
            .with_scaler_type(ScalerType::ZcaWhitening);
        source.fit(&data).unwrap();
        let expected = source.transform(&data).unwrap().to_vec();

        let moved = std::mem::take(&mut source);

        assert_eq!(source.scaler_type(), ScalerType::None);
        assert_eq!(source.config(), &ScalingModelConfig::default());
        assert_eq!(source.extract_params().scaler, None);

        assert_eq!(moved.scaler_type(), ScalerType::ZcaWhitening);
        assert_eq!(moved.config(), &ScalingModelConfig::new(2, 8, 1e-2));
        assert_eq!(moved.transform(&data).unwrap().to_vec(), expected);
    }

    #[test]
    fn test_params_round_trip_all_scalers() {
        let data = create_test_data();
        for tag in ScalerType::ALL {
            let model = fitted_model(tag);
            let restored = ScalingModel::<CpuBackend>::from_params(model.extract_params()).unwrap();

            assert_eq!(restored.scaler_type(), tag);
            assert_eq!(
                restored.transform(&data).unwrap().to_vec(),
                model.transform(&data).unwrap().to_vec()
            );
        }
    }

    #[test]
    fn test_params_json() {
        let model = fitted_model(ScalerType::MeanNormalization);
        let json = serde_json::to_string(&model.extract_params()).unwrap();
        assert!(json.contains("MeanNormalization"));

        let params: ScalingModelParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, model.extract_params());
    }

    #[test]
    fn test_save_load() {
        let data = create_test_data();
        let model = fitted_model(ScalerType::PcaWhitening);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        model.save_to_file(&path).unwrap();

        let loaded = ScalingModel::<CpuBackend>::load_from_file(&path).unwrap();
        assert_eq!(loaded.extract_params(), model.extract_params());
        assert_eq!(
            loaded.inverse_transform(&data).unwrap().to_vec(),
            model.inverse_transform(&data).unwrap().to_vec()
        );
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ScalingModel::<CpuBackend>::load_from_file(dir.path().join("missing.bin")),
            Err(PreprocessingError::IoError(_))
        ));

        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, [0xff; 3]).unwrap();
        assert!(matches!(
            ScalingModel::<CpuBackend>::load_from_file(&path),
            Err(PreprocessingError::SerializationError(_))
        ));
    }

    #[test]
    fn test_concurrent_transforms_agree() {
        let data = create_test_data();
        let model = fitted_model(ScalerType::ZcaWhitening);
        let expected = model.transform(&data).unwrap().to_vec();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| model.transform(&data).unwrap().to_vec()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
