use crate::config::DetectorConfig;
use crate::detector::{DETECTED_RELEASE_CLASSIFIER, Detector, RawPlatformInfo};
use crate::error::Result;

pub struct ClassifierCommand<'a> {
    config: &'a DetectorConfig,
}

impl<'a> ClassifierCommand<'a> {
    pub fn new(config: &'a DetectorConfig) -> Result<Self> {
        Ok(Self { config })
    }

    /// Print only the classifier, suitable for command substitution in
    /// build scripts. With `release` set, prefers the release-qualified
    /// classifier when Linux refinement produced one.
    pub fn execute(&self, raw: &RawPlatformInfo, release: bool) -> Result<()> {
        let detector = Detector::new(self.config.clone());
        let props = detector.detect(raw)?;

        let classifier = if release {
            props
                .get(DETECTED_RELEASE_CLASSIFIER)
                .unwrap_or_else(|| props.classifier())
        } else {
            props.classifier()
        };
        println!("{classifier}");

        Ok(())
    }
}
