// Credential-injection strategies for keyprobe
// The default set mirrors the header schemes the target platform has been
// observed to accept, in a fixed order so first-success selection is
// reproducible.

use crate::models::Credential;
use serde::Serialize;

/// Where the credential is injected into the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthPlacement {
    /// A request header, e.g. `X-Pendo-Integration-Key`.
    Header(&'static str),
    /// A query-string parameter, e.g. `?apiKey=...`.
    Query(&'static str),
}

/// One candidate injection scheme. The value template's `{key}` marker is
/// replaced with the raw credential at request-build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthVariant {
    pub name: &'static str,
    pub placement: AuthPlacement,
    pub value_template: &'static str,
}

impl AuthVariant {
    fn rendered_value(&self, credential: &Credential) -> String {
        self.value_template.replace("{key}", credential.expose())
    }

    /// Merge this variant into a request under construction.
    pub fn apply(
        &self,
        req: reqwest::RequestBuilder,
        credential: &Credential,
    ) -> reqwest::RequestBuilder {
        let value = self.rendered_value(credential);
        match self.placement {
            AuthPlacement::Header(header) => req.header(header, value),
            AuthPlacement::Query(param) => req.query(&[(param, value)]),
        }
    }
}

/// All candidate schemes, in the order they should be tried. Each variant
/// must be probed independently; one working never implies another does.
pub fn default_variants() -> Vec<AuthVariant> {
    vec![
        AuthVariant {
            name: "X-Pendo-Integration-Key",
            placement: AuthPlacement::Header("X-Pendo-Integration-Key"),
            value_template: "{key}",
        },
        AuthVariant {
            name: "Authorization Bearer",
            placement: AuthPlacement::Header("Authorization"),
            value_template: "Bearer {key}",
        },
        AuthVariant {
            name: "Pendo-Integration-Key",
            placement: AuthPlacement::Header("Pendo-Integration-Key"),
            value_template: "{key}",
        },
        AuthVariant {
            name: "api-key header",
            placement: AuthPlacement::Header("api-key"),
            value_template: "{key}",
        },
        AuthVariant {
            name: "apiKey query parameter",
            placement: AuthPlacement::Query("apiKey"),
            value_template: "{key}",
        },
    ]
}

/// The platform's documented scheme; used when a run does not scan the
/// whole strategy set.
pub fn canonical_variant() -> AuthVariant {
    default_variants().remove(0)
}
