use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::sync::OnceLock;
use std::{collections::HashSet, path::Path, str::FromStr};

use smartcore::linalg::basic::arrays::{Array1, MutArray};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::numbers::basenum::Number;
use stopwords::{Language, Stopwords, NLTK};

/// Class of a message. `Spam` is the positive class (index 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    pub fn index(self) -> usize {
        match self {
            Label::Ham => 0,
            Label::Spam => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Label::Ham),
            1 => Some(Label::Spam),
            _ => None,
        }
    }

    pub fn is_spam(self) -> bool {
        self == Label::Spam
    }
}

impl FromStr for Label {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ham" => Ok(Label::Ham),
            "spam" => Ok(Label::Spam),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Ham => f.write_str("ham"),
            Label::Spam => f.write_str("spam"),
        }
    }
}

#[derive(Debug)]
pub struct RawData {
    pub label: Label,
    pub sms: String,
}

#[derive(Debug, Default, Clone)]
pub struct TokenizedData {
    pub tokens: Vec<String>,
}

impl RawData {
    pub fn lowercase(self) -> Self {
        Self {
            label: self.label,
            sms: self.sms.to_lowercase(),
        }
    }

    pub fn without_punctuaction(self) -> Self {
        Self {
            label: self.label,
            sms: strip_punctuation(&self.sms),
        }
    }
}

#[derive(Debug)]
pub struct RawDataset {
    pub data: Vec<RawData>,
}

impl RawDataset {
    pub fn from_file<P>(path: P) -> Result<Self, std::io::Error>
    where
        P: AsRef<Path>,
    {
        Self::from_reader(File::open(path)?)
    }

    /// Parses `label<TAB>message` lines. Blank lines are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, std::io::Error> {
        let data = BufReader::new(reader)
            .lines()
            .enumerate()
            .filter(|(_, line)| !matches!(line, Ok(l) if l.trim().is_empty()))
            .map(|(number, line)| {
                let line = line?;
                let (label, sms) = line.split_once('\t').ok_or_else(|| {
                    invalid_data(format!("line {}: missing delimiter", number + 1))
                })?;
                let label = Label::from_str(label.trim()).map_err(|_| {
                    invalid_data(format!("line {}: invalid label {:?}", number + 1, label))
                })?;
                let sms = sms.to_string();
                Ok(RawData { label, sms })
            })
            .collect::<Result<Vec<_>, std::io::Error>>()?;
        Ok(Self { data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lowercase(self) -> Self {
        Self {
            data: self.data.into_iter().map(|row| row.lowercase()).collect(),
        }
    }

    pub fn without_punctuaction(self) -> Self {
        Self {
            data: self
                .data
                .into_iter()
                .map(|row| row.without_punctuaction())
                .collect(),
        }
    }

    pub fn tokenize(self) -> Dataset {
        let (labels, data) = self
            .data
            .into_iter()
            .map(|row| {
                (
                    row.label,
                    TokenizedData {
                        tokens: row.sms.split_whitespace().map(|s| s.to_string()).collect(),
                    },
                )
            })
            .unzip();
        Dataset { labels, data }
    }
}

#[derive(Debug)]
pub struct Dataset {
    pub labels: Vec<Label>,
    pub data: Vec<TokenizedData>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stop_words(self) -> Self {
        let stops = english_stop_words();
        Self {
            labels: self.labels,
            data: self
                .data
                .into_iter()
                .map(|row| TokenizedData {
                    tokens: row
                        .tokens
                        .into_iter()
                        .filter(|p| !stops.contains(p.as_str()))
                        .collect(),
                })
                .collect(),
        }
    }

    /// Token to column index, in order of first appearance.
    pub fn vocabulary(&self) -> HashMap<String, usize> {
        let mut vocabulary = HashMap::new();
        let mut index = 0;

        for word in self.data.iter().flat_map(|data| data.tokens.iter()) {
            if let Entry::Vacant(entry) = vocabulary.entry(word.clone()) {
                entry.insert(index);
                index += 1;
            }
        }

        vocabulary
    }

    pub fn to_smartcore<T: Number>(
        self,
    ) -> Result<(DenseMatrix<T>, Vec<T>, HashMap<String, usize>), std::io::Error> {
        if self.is_empty() {
            return Err(invalid_data("dataset is empty".to_string()));
        }

        let vocabulary = self.vocabulary();
        let labels = self
            .labels
            .into_iter()
            .map(|label| match label {
                Label::Spam => T::one(),
                Label::Ham => T::zero(),
            })
            .collect::<Vec<_>>();

        let data = self
            .data
            .into_iter()
            .map(|data| bag_of_words::<T>(data.tokens, &vocabulary))
            .collect::<Vec<_>>();

        let data_m = DenseMatrix::from_2d_vec(&data).map_err(|e| invalid_data(e.to_string()))?;

        Ok((data_m, labels, vocabulary))
    }
}

pub fn create_smartcore_input<T: Number, P: AsRef<Path>>(
    path: P,
) -> Result<(DenseMatrix<T>, Vec<T>, HashMap<String, usize>), std::io::Error> {
    RawDataset::from_file(path)?
        .lowercase()
        .without_punctuaction()
        .tokenize()
        .stop_words()
        .to_smartcore()
}

/// Runs a single message through the same cleaning steps used for training.
pub fn tokenize_message(sms: &str) -> Vec<String> {
    let stops = english_stop_words();
    strip_punctuation(&sms.to_lowercase())
        .split_whitespace()
        .filter(|token| !stops.contains(token))
        .map(ToString::to_string)
        .collect()
}

pub fn bag_of_words<T: Number>(tokens: Vec<String>, vocabulary: &HashMap<String, usize>) -> Vec<T> {
    let mut m = Vec::zeros(vocabulary.len());

    for token in tokens {
        if let Some(index) = vocabulary.get(&token) {
            m.add_element_mut(*index, T::one());
        }
    }

    m
}

fn english_stop_words() -> &'static HashSet<&'static str> {
    static STOPS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOPS.get_or_init(|| match NLTK::stopwords(Language::English) {
        Some(words) => words.iter().copied().collect(),
        None => {
            tracing::warn!("NLTK English stop words unavailable, no tokens will be filtered");
            HashSet::new()
        }
    })
}

fn strip_punctuation(sms: &str) -> String {
    sms.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

fn invalid_data(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, message)
}
