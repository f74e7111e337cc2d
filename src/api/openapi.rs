use super::handlers::{auth, health, planner, trips};
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` spec; handlers sharing a path go
/// into one `routes!` call. Routes added outside (like `/`) are intentionally
/// not documented.
pub(crate) fn api_router() -> OpenApiRouter {
    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(auth::signup::signup))
        .routes(routes!(auth::verification::verify_email))
        .routes(routes!(auth::login::login))
        .routes(routes!(auth::session::session))
        .routes(routes!(auth::session::logout))
        .routes(routes!(auth::password::forgot))
        .routes(routes!(
            auth::password::reset_precheck,
            auth::password::reset
        ))
        .routes(routes!(
            auth::profile::profile,
            auth::profile::update_profile
        ))
        .routes(routes!(trips::save_trip))
        .routes(routes!(trips::list_trips))
        .routes(routes!(trips::get_trip))
        .routes(routes!(planner::review_query, planner::review_submit))
        .routes(routes!(planner::generate))
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = cargo_license();

    // Tags go on the seed document; the router only appends paths and schemas.
    OpenApiBuilder::new()
        .info(info)
        .tags(Some(route_tags()))
        .build()
}

fn route_tags() -> Vec<Tag> {
    let mut auth_tag = Tag::new("auth");
    auth_tag.description =
        Some("Signup, verification, sessions, password recovery, profile".to_string());

    let mut trips_tag = Tag::new("trips");
    trips_tag.description = Some("Saved itineraries, owner-scoped".to_string());

    let mut planner_tag = Tag::new("planner");
    planner_tag.description = Some("Questionnaire review and itinerary generation".to_string());

    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Service health".to_string());

    vec![auth_tag, trips_tag, planner_tag, health_tag]
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    if let Some(start) = author.find('<') {
        let name = author[..start].trim();
        let email = author[start + 1..].trim_end_matches('>').trim();
        let name = if name.is_empty() { None } else { Some(name) };
        let email = if email.is_empty() { None } else { Some(email) };
        (name, email)
    } else {
        let name = author.trim();
        (if name.is_empty() { None } else { Some(name) }, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let spec = openapi();
        assert_eq!(spec.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            spec.info.description.as_deref(),
            Some(env!("CARGO_PKG_DESCRIPTION"))
        );

        let contact = spec.info.contact;
        assert!(contact.is_some());
        if let Some(contact) = contact {
            assert_eq!(contact.name.as_deref(), Some("Team Windrose"));
            assert_eq!(contact.email.as_deref(), Some("team@windrose.dev"));
        }

        let license = spec.info.license;
        assert!(license.is_some());
        if let Some(license) = license {
            assert_eq!(license.name, "BSD-3-Clause");
            assert_eq!(license.identifier.as_deref(), Some("BSD-3-Clause"));
        }
    }

    #[test]
    fn openapi_tags_and_paths() {
        // Tags are seeded before routing and must survive `split_for_parts`.
        let spec = openapi();
        let tags = spec.tags.clone().unwrap_or_default();
        for name in ["auth", "trips", "planner", "health"] {
            let tag = tags.iter().find(|tag| tag.name == name);
            assert!(
                tag.is_some_and(|tag| tag.description.is_some()),
                "missing documented tag {name}"
            );
        }

        for path in [
            "/auth/signup",
            "/auth/verify/{token}",
            "/auth/login",
            "/auth/session",
            "/auth/logout",
            "/auth/forgot",
            "/auth/reset/{token}",
            "/auth/profile",
            "/trips/save",
            "/trips",
            "/trips/{id}",
            "/review",
            "/generate",
            "/health",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn author_parsing_handles_both_forms() {
        assert_eq!(
            parse_author("Team Windrose <team@windrose.dev>"),
            (Some("Team Windrose"), Some("team@windrose.dev"))
        );
        assert_eq!(parse_author("Solo Author"), (Some("Solo Author"), None));
        assert_eq!(parse_author("<only@email.dev>"), (None, Some("only@email.dev")));
    }
}
