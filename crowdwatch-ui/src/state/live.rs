//! Live Push Connection
//!
//! One Socket.IO connection per session token, driven through
//! `web_sys::WebSocket` with the core packet codec. Occupancy and alert
//! events land in the dashboard's feeds, which apply the site filter.
//!
//! A dropped or refused connection is logged and left closed; only a
//! token change opens a new one.

use leptos::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use crowdwatch::live::{socket_url, LiveEvent, Packet};

use super::dashboard::DashboardState;
use super::session::AuthState;

struct Connection {
    url: String,
    socket: RefCell<Option<WebSocket>>,
    /// Bumped whenever the token changes; stale sockets check it before acting
    generation: Cell<u64>,
    dashboard: DashboardState,
}

impl Connection {
    fn open(self: &Rc<Self>, token: String) {
        let generation = self.generation.get();
        let ws = match WebSocket::new(&self.url) {
            Ok(ws) => ws,
            Err(e) => {
                web_sys::console::error_1(&format!("Live connection failed: {:?}", e).into());
                self.dashboard.live_connected.set(false);
                return;
            }
        };

        let this = Rc::clone(self);
        let sender = ws.clone();
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Ok(text) = event.data().dyn_into::<js_sys::JsString>() {
                let text: String = text.into();
                this.handle_frame(&text, &sender, &token);
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        on_message.forget();

        let this = Rc::clone(self);
        let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
            if this.generation.get() != generation {
                return;
            }
            web_sys::console::log_1(
                &format!("Live connection closed: code={}, reason={}", event.code(), event.reason()).into(),
            );
            this.dashboard.live_connected.set(false);
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();

        let on_error = Closure::wrap(Box::new(move |e: JsValue| {
            web_sys::console::error_1(&format!("Live connection error: {:?}", e).into());
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();

        *self.socket.borrow_mut() = Some(ws);
    }

    fn handle_frame(&self, text: &str, ws: &WebSocket, token: &str) {
        let packet = match Packet::parse(text) {
            Ok(packet) => packet,
            Err(e) => {
                web_sys::console::error_1(&format!("Bad live frame: {}", e).into());
                return;
            }
        };

        match packet {
            Packet::Open(_) => {
                let _ = ws.send_with_str(&Packet::connect_with_token(token).encode());
            }
            Packet::Ping => {
                let _ = ws.send_with_str(&Packet::Pong.encode());
            }
            Packet::Connect(_) => {
                web_sys::console::log_1(&"Live connection established".into());
                self.dashboard.live_connected.set(true);
            }
            Packet::ConnectError(message) => {
                web_sys::console::error_1(&format!("Live connection refused: {}", message).into());
                let _ = ws.close();
            }
            Packet::Event { name, data } => match LiveEvent::decode(&name, data) {
                Ok(Some(event @ LiveEvent::Occupancy(_))) => {
                    self.dashboard.occupancy.update(|slot| {
                        slot.apply(&event);
                    });
                }
                Ok(Some(event @ LiveEvent::Alert(_))) => {
                    self.dashboard.alerts.update(|feed| {
                        feed.apply(&event);
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    web_sys::console::error_1(&format!("Bad {} payload: {}", name, e).into());
                }
            },
            Packet::Close | Packet::Disconnect => {
                let _ = ws.close();
            }
            Packet::Pong | Packet::Noop => {}
        }
    }

    /// Drop the current socket and invalidate its callbacks
    fn close(&self) {
        self.generation.set(self.generation.get() + 1);
        self.dashboard.live_connected.set(false);
        if let Some(ws) = self.socket.borrow_mut().take() {
            let _ = ws.close();
        }
    }
}

/// What a token notification does to the connection
#[derive(Debug, PartialEq, Eq)]
enum Transition<'a> {
    Keep,
    Close,
    Replace(&'a str),
}

fn transition<'a>(previous: Option<&Option<String>>, current: &'a Option<String>) -> Transition<'a> {
    if previous == Some(current) {
        return Transition::Keep;
    }
    match current {
        Some(token) => Transition::Replace(token),
        None => Transition::Close,
    }
}

/// Keep one push connection per token value (call from app root).
///
/// A new token replaces the connection, logout closes it, and a repeated
/// notification with the same token leaves it alone. This effect is the only
/// place a socket is opened.
pub fn init_live_channel(auth: AuthState, dashboard: DashboardState) {
    let connection = Rc::new(Connection {
        url: socket_url(auth.api.base_url()),
        socket: RefCell::new(None),
        generation: Cell::new(0),
        dashboard,
    });

    let token = auth.token;
    create_effect(move |previous: Option<Option<String>>| {
        let current = token.get();
        match transition(previous.as_ref(), &current) {
            Transition::Keep => {}
            Transition::Close => connection.close(),
            Transition::Replace(value) => {
                connection.close();
                connection.open(value.to_string());
            }
        }
        current
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn token(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[wasm_bindgen_test]
    fn test_first_token_opens() {
        assert_eq!(transition(None, &token("a")), Transition::Replace("a"));
        assert_eq!(transition(Some(&None), &token("a")), Transition::Replace("a"));
    }

    #[wasm_bindgen_test]
    fn test_same_token_keeps_connection() {
        assert_eq!(transition(Some(&token("a")), &token("a")), Transition::Keep);
        assert_eq!(transition(Some(&None), &None), Transition::Keep);
    }

    #[wasm_bindgen_test]
    fn test_new_token_replaces_and_logout_closes() {
        assert_eq!(transition(Some(&token("a")), &token("b")), Transition::Replace("b"));
        assert_eq!(transition(Some(&token("b")), &None), Transition::Close);
    }
}
