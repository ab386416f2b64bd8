use std::{collections::BTreeMap, fmt};

use itertools::Itertools;
use serde::{ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScrapeError;

/// Raw scraped fields keyed by their source label, e.g. `"Part of"` or `"rating"`.
pub type FieldMap = BTreeMap<String, Option<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompanyField {
    Id,
    Name,
    OverviewUrl,
    ReviewsUrl,
    LinkedinUrl,
    Rating,
    ReviewCounts,
    Website,
    Headquarters,
    PartOf,
    Size,
    Founded,
    Type,
    Industry,
    Revenue,
    Competitors,
    LogoUrl,
}

impl CompanyField {
    pub const ALL: [CompanyField; 17] = [
        CompanyField::Id,
        CompanyField::Name,
        CompanyField::OverviewUrl,
        CompanyField::ReviewsUrl,
        CompanyField::LinkedinUrl,
        CompanyField::Rating,
        CompanyField::ReviewCounts,
        CompanyField::Website,
        CompanyField::Headquarters,
        CompanyField::PartOf,
        CompanyField::Size,
        CompanyField::Founded,
        CompanyField::Type,
        CompanyField::Industry,
        CompanyField::Revenue,
        CompanyField::Competitors,
        CompanyField::LogoUrl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyField::Id => "id",
            CompanyField::Name => "name",
            CompanyField::OverviewUrl => "overview_url",
            CompanyField::ReviewsUrl => "reviews_url",
            CompanyField::LinkedinUrl => "linkedin_url",
            CompanyField::Rating => "rating",
            CompanyField::ReviewCounts => "review_counts",
            CompanyField::Website => "website",
            CompanyField::Headquarters => "headquarters",
            CompanyField::PartOf => "part_of",
            CompanyField::Size => "size",
            CompanyField::Founded => "founded",
            CompanyField::Type => "type",
            CompanyField::Industry => "industry",
            CompanyField::Revenue => "revenue",
            CompanyField::Competitors => "competitors",
            CompanyField::LogoUrl => "logo_url",
        }
    }

    /// Accepts both field names and display labels: `"Part of"` and `"part_of"`
    /// resolve to the same field.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = normalize_key(key);
        Self::ALL.into_iter().find(|field| field.as_str() == key)
    }
}

impl fmt::Display for CompanyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn normalize_key(key: &str) -> String {
    key.trim().replace(' ', "_").to_lowercase()
}

/// Persistence key for a company: lower-cased display name with whitespace
/// runs collapsed to `_`.
pub fn company_id(name: &str) -> String {
    name.split_whitespace().join("_").to_lowercase()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    fields: BTreeMap<CompanyField, Option<String>>,
    extra: FieldMap,
}

impl Company {
    pub fn new(id: impl Into<String>) -> Self {
        let mut fields: BTreeMap<CompanyField, Option<String>> =
            CompanyField::ALL.into_iter().map(|f| (f, None)).collect();
        fields.insert(CompanyField::Id, Some(id.into()));

        Company {
            fields,
            extra: FieldMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        self.get(CompanyField::Id).unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.get(CompanyField::Name).unwrap_or_default()
    }

    pub fn get(&self, field: CompanyField) -> Option<&str> {
        self.fields.get(&field).and_then(|v| v.as_deref())
    }

    pub fn set(&mut self, field: CompanyField, value: Option<String>) {
        self.fields.insert(field, value);
    }

    /// Keys outside the allow-list that were written through `update_data`.
    pub fn extra(&self) -> &FieldMap {
        &self.extra
    }

    /// Bulk write. Unknown keys are kept aside and reported, never rejected.
    pub fn update_data<I, K>(&mut self, data: I)
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: AsRef<str>,
    {
        for (key, value) in data {
            let key = key.as_ref();
            match CompanyField::from_key(key) {
                Some(field) => self.set(field, value),
                None => {
                    log::warn!("Unexpected key \"{}\" when updating \"{}\"", key, self.id());
                    self.extra.insert(normalize_key(key), value);
                }
            }
        }
    }
}

impl Serialize for Company {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + self.extra.len()))?;
        for field in CompanyField::ALL {
            map.serialize_entry(field.as_str(), &self.get(field))?;
        }
        for (key, value) in self.extra.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Company {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        FieldMap::deserialize(deserializer).map(Company::from)
    }
}

impl From<FieldMap> for Company {
    fn from(data: FieldMap) -> Self {
        let id = match (data.get("id"), data.get("name")) {
            (Some(Some(id)), _) => id.clone(),
            (_, Some(Some(name))) => company_id(name),
            _ => String::new(),
        };

        let mut company = Company::new(id);
        company.update_data(data.into_iter().filter(|(k, _)| k != "id"));
        company
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "Company({})", self.id()),
        }
    }
}

/// A company the batch gave up on, together with the reason.
#[derive(Debug)]
pub struct FailedCompany {
    pub company_name: String,
    pub error: ScrapeError,
}

impl fmt::Display for FailedCompany {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}
