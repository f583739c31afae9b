// Copyright 2025 osdet contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::DetectorConfig;
use crate::detector::{Detector, RawPlatformInfo};
use crate::error::Result;

pub struct DetectCommand<'a> {
    config: &'a DetectorConfig,
}

impl<'a> DetectCommand<'a> {
    pub fn new(config: &'a DetectorConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self, raw: &RawPlatformInfo, json: bool) -> Result<()> {
        log::info!("Detecting the operating system and CPU architecture");

        let detector = Detector::new(self.config.clone());
        let props = detector.detect(raw)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&props)?);
        } else {
            for (key, value) in props.iter() {
                println!("{key}: {value}");
            }
        }

        Ok(())
    }
}
