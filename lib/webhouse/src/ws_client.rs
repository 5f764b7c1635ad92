use std::fmt;
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::{debug, trace};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::Result;

#[derive(Debug)]
pub enum WsError {
    StreamClosed,
    CannotParse(std::string::FromUtf8Error),
    WebSocketError(tungstenite::error::Error),
    UnexpectedMessage(Message),
}

impl fmt::Display for WsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WsError::StreamClosed => write!(f, "stream closed"),
            WsError::CannotParse(error) => write!(f, "cannot parse: {}", error),
            WsError::WebSocketError(error) => write!(f, "websocket error: {}", error),
            WsError::UnexpectedMessage(message) => write!(f, "unexpected message: {:?}", message),
        }
    }
}

impl std::error::Error for WsError {}

impl From<std::string::FromUtf8Error> for WsError {
    fn from(value: std::string::FromUtf8Error) -> Self {
        WsError::CannotParse(value)
    }
}

impl From<tungstenite::error::Error> for WsError {
    fn from(value: tungstenite::error::Error) -> Self {
        match value {
            tungstenite::error::Error::AlreadyClosed
            | tungstenite::error::Error::ConnectionClosed => WsError::StreamClosed,
            value => WsError::WebSocketError(value),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Text(String),
    Closed(Option<String>),
}

type Writer = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type Reader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

#[derive(Clone)]
pub struct WsClient {
    url: String,
    write: Arc<Mutex<Writer>>,
    read: Arc<Mutex<Reader>>,
}

impl WsClient {
    pub async fn connect(url: &str, protocol: Option<&str>) -> Result<WsClient> {
        let mut request = url.into_client_request()?;

        if let Some(protocol) = protocol {
            let value = HeaderValue::from_str(protocol)
                .map_err(|err| tungstenite::Error::HttpFormat(err.into()))?;
            request.headers_mut().insert("Sec-WebSocket-Protocol", value);
        }

        let (web_socket, _) = connect_async(request).await?;
        debug!("connected to {url}");

        let (write, read) = web_socket.split();

        Ok(WsClient {
            url: url.to_string(),
            write: Arc::new(Mutex::new(write)),
            read: Arc::new(Mutex::new(read)),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn send_text(&self, text: &str) -> Result<()> {
        trace!("writing {text}");

        let mut write = self.write.lock().await;
        write.send(Message::Text(text.to_owned().into())).await?;

        Ok(())
    }

    pub async fn read_frame(&self) -> std::result::Result<Frame, WsError> {
        let mut read = self.read.lock().await;

        loop {
            let message = read.next().await.ok_or(WsError::StreamClosed)??;
            trace!("read {message:?}");

            match message {
                Message::Text(text) => return Ok(Frame::Text(text.to_string())),
                Message::Binary(payload) => {
                    let text = String::from_utf8(payload.to_vec())?;
                    return Ok(Frame::Text(text));
                }
                Message::Ping(payload) => {
                    let mut write = self.write.lock().await;
                    write.send(Message::Pong(payload)).await?;
                }
                Message::Pong(_) => (),
                Message::Close(frame) => {
                    let reason = frame.map(|frame| frame.reason.to_string());
                    return Ok(Frame::Closed(reason));
                }
                message => return Err(WsError::UnexpectedMessage(message)),
            }
        }
    }

    pub async fn close(&self) -> Result<()> {
        let mut write = self.write.lock().await;
        write.close().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
    use tokio_tungstenite::{accept_async, accept_hdr_async};

    async fn listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        (listener, url)
    }

    #[tokio::test]
    async fn test_exchange_frames() {
        let (listener, url) = listener().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut socket = accept_async(stream).await.unwrap();

            let message = socket.next().await.unwrap().unwrap();
            assert_eq!(message.into_text().unwrap().to_string(), r#"{"TV":"ON"}"#);

            socket
                .send(Message::Ping(vec![1, 2, 3].into()))
                .await
                .unwrap();
            socket
                .send(Message::Text(r#"{"TempIst":"23"}"#.to_string().into()))
                .await
                .unwrap();

            let pong = socket.next().await.unwrap().unwrap();
            assert!(matches!(pong, Message::Pong(_)));

            socket.close(None).await.unwrap();
        });

        let client = WsClient::connect(&url, None).await.unwrap();
        client.send_text(r#"{"TV":"ON"}"#).await.unwrap();

        assert_eq!(
            client.read_frame().await.unwrap(),
            Frame::Text(r#"{"TempIst":"23"}"#.to_string())
        );
        assert!(matches!(
            client.read_frame().await.unwrap(),
            Frame::Closed(_)
        ));

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_offers_protocol() {
        let (listener, url) = listener().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let callback = |request: &Request, mut response: Response| {
                let protocol = request
                    .headers()
                    .get("Sec-WebSocket-Protocol")
                    .cloned()
                    .expect("protocol header");
                assert_eq!(protocol, "webhuesli-protocol");

                response
                    .headers_mut()
                    .insert("Sec-WebSocket-Protocol", protocol);
                Ok::<Response, ErrorResponse>(response)
            };

            let mut socket = accept_hdr_async(stream, callback).await.unwrap();
            socket
                .send(Message::Text(r#"{"Burglar":"1"}"#.to_string().into()))
                .await
                .unwrap();
        });

        let client = WsClient::connect(&url, Some("webhuesli-protocol"))
            .await
            .unwrap();

        assert_eq!(
            client.read_frame().await.unwrap(),
            Frame::Text(r#"{"Burglar":"1"}"#.to_string())
        );

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let (listener, url) = listener().await;
        drop(listener);

        assert!(WsClient::connect(&url, None).await.is_err());
    }
}
