// Web UI URL resolver: substitutes [IP] and [PORT:n] placeholders against an
// entry's network facts. Pure and idempotent; reruns on stale inputs produce
// the same output.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use crate::models::{NetworkMode, ServiceEntry};

/// Compute `resolved_url` for one entry. `host_address` is the polled host,
/// used only for host-networked entries. Rather a missing URL than a wrong
/// one: any placeholder that cannot be substituted leaves the URL absent.
pub fn resolve(mut entry: ServiceEntry, host_address: Option<&str>) -> ServiceEntry {
    entry.resolved_url = entry
        .web_ui_template
        .as_deref()
        .and_then(|template| substitute(template, &entry, host_address));
    entry
}

fn substitute(template: &str, entry: &ServiceEntry, host_address: Option<&str>) -> Option<String> {
    let mut url = template.to_string();
    if url.contains("[IP]") {
        let address = address_for(entry, host_address)?;
        url = url.replace("[IP]", &address);
    }
    let url = substitute_ports(&url, &entry.network_facts.ports);
    finalize(&url)
}

/// Which address stands in for `[IP]`, by network mode. Bridge, macvlan and
/// namespace-sharing entries use their own (possibly inherited) facts; host
/// networking uses the polled host; anything unknown fails closed.
fn address_for(entry: &ServiceEntry, host_address: Option<&str>) -> Option<String> {
    match entry.network_mode.as_ref()? {
        NetworkMode::Bridge | NetworkMode::Macvlan | NetworkMode::ContainerShared(_) => {
            pick_address(&entry.network_facts.addresses)
        }
        NetworkMode::Host => host_address.map(str::to_string),
        NetworkMode::Unknown => None,
    }
}

/// Prefer an RFC1918 address (the one a LAN browser can reach); otherwise the
/// first listed.
fn pick_address(addresses: &[String]) -> Option<String> {
    addresses
        .iter()
        .find(|a| a.parse::<Ipv4Addr>().is_ok_and(|ip| ip.is_private()))
        .or_else(|| addresses.first())
        .cloned()
}

/// Replace every well-formed `[PORT:<digits>]` token. A port with no host
/// mapping substitutes its own literal digits (macvlan and host networking
/// publish no mappings, the container port is directly reachable). Malformed
/// tokens pass through untouched.
fn substitute_ports(input: &str, ports: &BTreeMap<u16, u16>) -> String {
    const OPEN: &str = "[PORT:";
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        match after.find(']') {
            Some(end) if end > 0 && after[..end].bytes().all(|b| b.is_ascii_digit()) => {
                let digits = &after[..end];
                match digits.parse::<u16>().ok().and_then(|p| ports.get(&p)) {
                    Some(host_port) => out.push_str(&host_port.to_string()),
                    None => out.push_str(digits),
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push_str(OPEN);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Final guards on the substituted URL. Only http(s) schemes survive (label
/// text is untrusted; this drops javascript:/data: templates). A trailing
/// "/system/status" is a status API path some templates carry, not a UI page;
/// it rewrites to the root.
fn finalize(url: &str) -> Option<String> {
    let lower = url.to_lowercase();
    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        return None;
    }
    let rewritten = url
        .strip_suffix("/system/status/")
        .or_else(|| url.strip_suffix("/system/status"))
        .map(|base| format!("{base}/"));
    Some(rewritten.unwrap_or_else(|| url.to_string()))
}
