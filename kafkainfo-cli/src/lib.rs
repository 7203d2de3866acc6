// Copyright ⓒ 2024-2025 Peter Morgan <peter.james.morgan@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{collections::HashMap, env::vars, fmt, result, str::FromStr};

mod cli;

pub use cli::Cli;
use regex::{Regex, Replacer};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    Box(#[from] Box<dyn std::error::Error + Send + Sync>),
    Cat(Box<kafkainfo_cat::Error>),
    Client(#[from] kafkainfo_client::Error),
    Cluster(#[from] kafkainfo_cluster::Error),
    Dashboard(Box<kafkainfo_dashboard::Error>),
    DotEnv(#[from] dotenv::Error),
    Regex(#[from] regex::Error),
    Url(#[from] url::ParseError),
}

impl From<kafkainfo_cat::Error> for Error {
    fn from(value: kafkainfo_cat::Error) -> Self {
        Self::Cat(Box::new(value))
    }
}

impl From<kafkainfo_dashboard::Error> for Error {
    fn from(value: kafkainfo_dashboard::Error) -> Self {
        Self::Dashboard(Box::new(value))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

pub type Result<T, E = Error> = result::Result<T, E>;

#[derive(Clone, Debug)]
pub struct VarRep(HashMap<String, String>);

impl From<HashMap<String, String>> for VarRep {
    fn from(value: HashMap<String, String>) -> Self {
        Self(value)
    }
}

impl VarRep {
    /// expand every `${VAR}`, unknown variables expand to nothing
    fn replace(&self, haystack: &str) -> Result<String> {
        Regex::new(r"\$\{(?<var>[^\}]+)\}")
            .map(|re| re.replace_all(haystack, self).into_owned())
            .map_err(Into::into)
    }
}

impl Replacer for &VarRep {
    fn replace_append(&mut self, caps: &regex::Captures<'_>, dst: &mut String) {
        if let Some(value) = caps
            .name("var")
            .and_then(|variable| self.0.get(variable.as_str()))
        {
            dst.push_str(value);
        }
    }
}

#[derive(Clone, Debug)]
pub struct EnvVarExp<T>(T);

impl<T> EnvVarExp<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromStr for EnvVarExp<T>
where
    T: FromStr,
    Error: From<<T as FromStr>::Err>,
{
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VarRep::from(vars().collect::<HashMap<_, _>>())
            .replace(s)
            .and_then(|s| T::from_str(&s).map_err(Into::into))
            .map(|t| Self(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn var_rep(pairs: &[(&str, &str)]) -> VarRep {
        VarRep::from(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn expands_every_reference() -> Result<()> {
        let rep = var_rep(&[("HOST", "kafka"), ("PORT", "9093")]);

        assert_eq!(
            "tcp://kafka:9093,tcp://kafka:9092",
            rep.replace("tcp://${HOST}:${PORT},tcp://${HOST}:9092")?
        );
        Ok(())
    }

    #[test]
    fn unknown_variable_expands_to_nothing() -> Result<()> {
        assert_eq!("tcp://:9092", var_rep(&[]).replace("tcp://${HOST}:9092")?);
        Ok(())
    }

    #[test]
    fn plain_text_is_unchanged() -> Result<()> {
        assert_eq!(
            "tcp://localhost:9092",
            var_rep(&[("HOST", "kafka")]).replace("tcp://localhost:9092")?
        );
        Ok(())
    }

    #[test]
    fn parses_after_expansion() -> Result<()> {
        let url = EnvVarExp::<url::Url>::from_str("tcp://localhost:9092")?.into_inner();
        assert_eq!(Some("localhost"), url.host_str());
        assert_eq!(Some(9092), url.port());
        Ok(())
    }

    #[test]
    fn parse_failure_is_an_error() {
        assert!(matches!(
            EnvVarExp::<url::Url>::from_str("not a url"),
            Err(Error::Url(_))
        ));
    }
}
