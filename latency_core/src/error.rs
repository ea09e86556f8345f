use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("insufficient calibration data: need observations at two or more distinct codes")]
    InsufficientData,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlignError {
    #[error("calibration table has not been built")]
    TableNotBuilt,
    #[error("no reference reports collected")]
    NoReferenceReports,
    #[error("no test reports collected")]
    NoTestReports,
}
