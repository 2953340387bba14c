//! Web server command.

use std::net::{SocketAddr, ToSocketAddrs};

use console::style;

use crate::config::Settings;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;
    let addr = resolve(&host, port)?;

    println!(
        "{} Starting insightboard server at http://{}",
        style("→").cyan(),
        addr
    );
    println!("  Text model endpoint: {}", settings.llm.endpoint);
    if settings.llm.api_key.is_none() {
        println!(
            "  {} No API key set (LLM_API_KEY / OPENAI_API_KEY)",
            style("!").yellow()
        );
    }
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, addr).await
}

const DEFAULT_PORT: u16 = 3030;

/// Split a bind address into host and port.
///
/// Accepts a bare port (`3030`, bound on loopback), a bare host
/// (`0.0.0.0`, `::1`) or `host:port`, with IPv6 hosts bracketed when a port
/// follows (`[::1]:3030`). Missing ports default to 3030.
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    let bind = bind.trim();
    if bind.is_empty() {
        anyhow::bail!("Empty bind address");
    }

    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    if let Some(rest) = bind.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| anyhow::anyhow!("Unclosed '[' in bind address {}", bind))?;
        let port = match tail {
            "" => DEFAULT_PORT,
            _ => match tail.strip_prefix(':') {
                Some(port) => parse_port(port, bind)?,
                None => anyhow::bail!("Unexpected text after ']' in bind address {}", bind),
            },
        };
        return Ok((host.to_string(), port));
    }

    // More than one colon without brackets is an IPv6 host with no port.
    if bind.matches(':').count() > 1 {
        return Ok((bind.to_string(), DEFAULT_PORT));
    }

    match bind.split_once(':') {
        Some((host, port)) => Ok((host.to_string(), parse_port(port, bind)?)),
        None => Ok((bind.to_string(), DEFAULT_PORT)),
    }
}

fn parse_port(port: &str, bind: &str) -> anyhow::Result<u16> {
    port.parse()
        .map_err(|_| anyhow::anyhow!("Invalid port '{}' in bind address {}", port, bind))
}

fn resolve(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| anyhow::anyhow!("Could not resolve {}:{}", host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() {
        assert_eq!(
            parse_bind_address("8080").unwrap(),
            ("127.0.0.1".to_string(), 8080)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0").unwrap(),
            ("0.0.0.0".to_string(), 3030)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0:9000").unwrap(),
            ("0.0.0.0".to_string(), 9000)
        );
        assert!(parse_bind_address("").is_err());
    }

    #[test]
    fn test_parse_ipv6_bind_address() {
        assert_eq!(
            parse_bind_address("[::1]:3031").unwrap(),
            ("::1".to_string(), 3031)
        );
        assert_eq!(
            parse_bind_address("[::1]").unwrap(),
            ("::1".to_string(), 3030)
        );
        assert_eq!(parse_bind_address("::").unwrap(), ("::".to_string(), 3030));
        assert!(parse_bind_address("[::1").is_err());
        assert!(parse_bind_address("localhost:http").is_err());

        let addr = resolve("::1", 3031).unwrap();
        assert_eq!(addr, "[::1]:3031".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_resolve_ip() {
        let addr = resolve("127.0.0.1", 3030).unwrap();
        assert_eq!(addr, "127.0.0.1:3030".parse::<SocketAddr>().unwrap());
    }
}
