//! Throwaway HTTP servers for exercising the HTTP collaborators without a real upstream.
use std::time::Duration;

use log::*;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Reads the request head and returns it as text. Bodies are ignored.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            },
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Serves `body` with the given status to every connection. Returns the base URL of the server.
pub async fn serve_canned_response(status: u16, body: &str) -> String {
    let (url, _) = serve_and_record(status, body).await;
    url
}

/// Like [`serve_canned_response`], but also hands back a channel carrying the head of every request received.
pub async fn serve_and_record(status: u16, body: &str) -> (String, tokio::sync::mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Could not bind test listener");
    let url = format!("http://{}", listener.local_addr().expect("No local address"));
    let response = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        reason(status),
        body.len()
    );
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let head = read_request(&mut stream).await;
            trace!("Canned server received: {head}");
            let _ = tx.send(head);
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });
    (url, rx)
}

/// Accepts connections and never answers them. Returns the base URL of the server.
pub async fn serve_silence() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Could not bind test listener");
    let url = format!("http://{}", listener.local_addr().expect("No local address"));
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });
    url
}
