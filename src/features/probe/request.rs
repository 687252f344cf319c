use crate::config::ProbeTarget;

pub const USER_AGENT: &str = "SimpleHTTPClient/0.1.0";

/// Renders the HTTP/1.0 GET request. `Connection: close` makes the peer
/// close the stream after responding, which is how the receiver knows the
/// response is complete.
pub fn render_request(target: &ProbeTarget) -> String {
    format!(
        "GET {path} HTTP/1.0\r\n\
         Host: {host}\r\n\
         Accept: */*\r\n\
         Accept-Language: en-US,en;q=0.9\r\n\
         User-Agent: {USER_AGENT}\r\n\
         Connection: close\r\n\
         \r\n",
        path = target.path(),
        host = target.host(),
    )
}
