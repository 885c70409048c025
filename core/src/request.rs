//! Form-encoded request construction.
//!
//! # Design
//! A sync call is one POST whose form body carries the token, the sync token,
//! the resource types to read and the commands to apply, with the last three
//! JSON-encoded. Fields are written in key order and percent-encoded with
//! everything outside `[A-Za-z0-9-_.~]` escaped, so the full-sync token `*`
//! goes out as `%2A`. Nothing here performs I/O.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use tracing::debug;

use crate::command::Command;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::http::{HttpRequest, FORM_CONTENT_TYPE};

/// Sync token requesting a full snapshot.
pub const FULL_SYNC: &str = "*";

/// Resource type selecting every collection.
pub const ALL_RESOURCES: &str = "all";

const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Build the POST for `<base>/sync`.
///
/// An empty or absent `sync_token` requests a full sync, an empty
/// `resource_types` reads every collection, and an empty `commands` leaves the
/// `commands` field out of the form.
pub fn build_sync_request(
    config: &ClientConfig,
    sync_token: Option<&str>,
    resource_types: &[&str],
    commands: &[Command],
) -> Result<HttpRequest, Error> {
    let url = endpoint(config, "sync")?;

    let mut form = BTreeMap::new();
    if !commands.is_empty() {
        form.insert("commands", to_json("commands", commands)?);
    }
    let resource_types = if resource_types.is_empty() {
        &[ALL_RESOURCES][..]
    } else {
        resource_types
    };
    form.insert("resource_types", to_json("resource_types", resource_types)?);
    let sync_token = sync_token.filter(|token| !token.is_empty()).unwrap_or(FULL_SYNC);
    form.insert("sync_token", sync_token.to_string());

    if config.debug {
        debug!(
            url = %url,
            sync_token,
            resource_types = %form["resource_types"],
            commands = form.get("commands").map(String::as_str).unwrap_or(""),
            "built sync request"
        );
    }

    form.insert("token", config.token.clone());
    Ok(form_request(config, url, &form))
}

/// Build a POST for one of the plain form endpoints under the base URL, such
/// as `projects/get`. The token is added to `fields`.
pub fn build_form_request(
    config: &ClientConfig,
    path: &str,
    fields: &[(&'static str, String)],
) -> Result<HttpRequest, Error> {
    let url = endpoint(config, path)?;

    let mut form: BTreeMap<&str, String> = fields.iter().cloned().collect();
    if config.debug {
        debug!(url = %url, fields = ?form, "built form request");
    }

    form.insert("token", config.token.clone());
    Ok(form_request(config, url, &form))
}

fn endpoint(config: &ClientConfig, path: &str) -> Result<String, Error> {
    let raw = format!("{}/{}", config.base_url, path);
    let url = url::Url::parse(&raw).map_err(|source| Error::InvalidBaseUrl {
        url: config.base_url.clone(),
        source,
    })?;
    Ok(url.into())
}

fn to_json<T: Serialize + ?Sized>(field: &'static str, value: &T) -> Result<String, Error> {
    serde_json::to_string(value).map_err(|source| Error::Serialize { field, source })
}

fn form_request(config: &ClientConfig, url: String, form: &BTreeMap<&str, String>) -> HttpRequest {
    let body = form
        .iter()
        .map(|(key, value)| format!("{key}={}", utf8_percent_encode(value, FORM_VALUE)))
        .collect::<Vec<_>>()
        .join("&");

    let mut headers = vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())];
    if !config.user_agent.is_empty() {
        headers.push(("User-Agent".to_string(), config.user_agent.clone()));
    }

    HttpRequest {
        url,
        headers,
        body,
        timeout: None,
    }
}
