use url::form_urlencoded;

/// Ordered set of response parameters.
///
/// Setting an existing name replaces its value in place, so the
/// order in which parameters were first added is what a responder encodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseParams {
    params: Vec<(String, String)>,
}

impl ResponseParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.params.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// `application/x-www-form-urlencoded` serialization, in insertion order.
    pub fn to_form_urlencoded(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    fn extend(&mut self, other: ResponseParams) {
        for (name, value) in other.params {
            self.set(name, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ResponseParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = ResponseParams::new();
        for (name, value) in iter {
            params.set(name, value);
        }
        params
    }
}

/// Artifacts accumulated while a grant issues its response.
///
/// Later issuance stages see everything earlier stages produced.
/// Parameters are only ever added or updated, never removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IssuedArtifacts {
    params: ResponseParams,
}

impl IssuedArtifacts {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.params.get("access_token")
    }

    pub fn token_type(&self) -> Option<&str> {
        self.params.get("token_type")
    }

    pub fn code(&self) -> Option<&str> {
        self.params.get("code")
    }

    pub fn id_token(&self) -> Option<&str> {
        self.params.get("id_token")
    }

    pub fn state(&self) -> Option<&str> {
        self.params.get("state")
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn as_params(&self) -> &ResponseParams {
        &self.params
    }

    pub fn into_params(self) -> ResponseParams {
        self.params
    }

    pub(crate) fn record(&mut self, name: &str, value: String) {
        self.params.set(name, value);
    }

    /// Merge integrator supplied parameters, updating existing ones in place.
    pub(crate) fn merge(&mut self, params: ResponseParams) {
        self.params.extend(params);
    }

    pub(crate) fn set_default(&mut self, name: &str, value: &str) {
        if !self.params.contains(name) {
            self.params.set(name, value);
        }
    }

    pub(crate) fn set(&mut self, name: &str, value: &str) {
        self.params.set(name, value);
    }
}
