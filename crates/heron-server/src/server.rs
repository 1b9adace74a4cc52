//! The server: route registration plus the TCP accept loop.
//!
//! Registration happens on a [`Server`] value. [`Server::start`] consumes it,
//! so no route or middleware can be added once connections are accepted.
//!
//! # Example
//!
//! ```rust,no_run
//! use heron_core::{HeronResult, RequestContext, Response};
//! use heron_server::{Server, ServerOptions};
//!
//! async fn hello(_ctx: RequestContext, mut response: Response) -> HeronResult<Response> {
//!     response.send("hello")?;
//!     Ok(response)
//! }
//!
//! # async fn run() -> Result<(), heron_server::ServerError> {
//! let mut server = Server::new("hello", ServerOptions::new().port(3030));
//! server.get("/hello", hello);
//! server.run().await
//! # }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use heron_config::ServerSection;
use heron_core::{boxed, Handler};
use heron_middleware::{Middleware, MiddlewareChain};
use heron_router::RouteMethod;
use heron_telemetry::RequestLogger;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::{ConnectionTracker, Dispatcher, ServerError, ServerOptions, ShutdownSignal};

/// An HTTP server under construction.
pub struct Server {
    name: String,
    options: ServerOptions,
    dispatcher: Dispatcher,
}

impl Server {
    /// Creates a server with the built-in middleware the options ask for.
    #[must_use]
    pub fn new(name: impl Into<String>, options: ServerOptions) -> Self {
        let middleware = MiddlewareChain::builder()
            .json(options.json)
            .cors(options.cors.clone())
            .build();
        let dispatcher = Dispatcher::new(
            middleware,
            RequestLogger::new(options.verbose),
            options.body_timeout,
        );

        Self {
            name: name.into(),
            options,
            dispatcher,
        }
    }

    /// Creates a server from a loaded configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidOptions`] if the section's CORS origin
    /// is unusable.
    pub fn from_config(section: &ServerSection) -> Result<Self, ServerError> {
        let options = ServerOptions::from_config(section)?;
        Ok(Self::new(section.name.clone(), options))
    }

    /// Returns the server name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &ServerOptions {
        &self.options
    }

    /// Registers a GET route.
    pub fn get<H: Handler>(&mut self, path: &str, handler: H) -> &mut Self {
        self.route(RouteMethod::Get, path, handler)
    }

    /// Registers a POST route.
    pub fn post<H: Handler>(&mut self, path: &str, handler: H) -> &mut Self {
        self.route(RouteMethod::Post, path, handler)
    }

    /// Registers a PUT route.
    pub fn put<H: Handler>(&mut self, path: &str, handler: H) -> &mut Self {
        self.route(RouteMethod::Put, path, handler)
    }

    /// Registers a DELETE route.
    pub fn delete<H: Handler>(&mut self, path: &str, handler: H) -> &mut Self {
        self.route(RouteMethod::Delete, path, handler)
    }

    /// Registers a route for `method`.
    pub fn route<H: Handler>(&mut self, method: RouteMethod, path: &str, handler: H) -> &mut Self {
        self.dispatcher.routes_mut().add(method, path, boxed(handler));
        self
    }

    /// Appends `middleware` to the chain under `name`.
    ///
    /// Custom middleware runs after the built-in entries. Re-using a name
    /// replaces that entry where it stands.
    pub fn use_middleware<M: Middleware>(&mut self, name: impl Into<String>, middleware: M) -> &mut Self {
        self.dispatcher.middleware_mut().insert_named(name, middleware);
        self
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Gives up the socket side and returns the dispatcher alone.
    #[must_use]
    pub fn into_dispatcher(self) -> Dispatcher {
        self.dispatcher
    }

    /// Binds and starts serving in the background.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        self.start_with_shutdown(ShutdownSignal::new()).await
    }

    /// Like [`start`](Self::start), stopping when `shutdown` triggers.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn start_with_shutdown(self, shutdown: ShutdownSignal) -> Result<ServerHandle, ServerError> {
        let Self {
            name,
            options,
            dispatcher,
        } = self;

        let listener = TcpListener::bind((options.host.as_str(), options.port))
            .await
            .map_err(|source| ServerError::Bind {
                host: options.host.clone(),
                port: options.port,
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            host: options.host.clone(),
            port: options.port,
            source,
        })?;

        let logger = dispatcher.logger();
        logger.listening(&name, local_addr);

        let accept = AcceptLoop {
            name,
            listener,
            dispatcher: Arc::new(dispatcher),
            shutdown: shutdown.clone(),
            shutdown_timeout: options.shutdown_timeout,
            logger,
        };
        let task = tokio::spawn(accept.run());

        Ok(ServerHandle {
            local_addr,
            shutdown,
            task,
        })
    }

    /// Serves until SIGINT or SIGTERM, then drains and returns.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let handle = self.start_with_shutdown(ShutdownSignal::with_os_signals()).await?;
        handle.wait().await
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

/// A running server.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: ShutdownSignal,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Returns the bound address; useful with port `0`.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns the signal that stops this server.
    #[must_use]
    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Stops accepting, lets open connections finish, then returns.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Task`] if the serving task panicked.
    pub async fn stop(self) -> Result<(), ServerError> {
        self.shutdown.trigger();
        self.wait().await
    }

    /// Waits for the server to stop by other means.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Task`] if the serving task panicked.
    pub async fn wait(self) -> Result<(), ServerError> {
        self.task.await?;
        Ok(())
    }
}

struct AcceptLoop {
    name: String,
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    shutdown: ShutdownSignal,
    shutdown_timeout: Duration,
    logger: RequestLogger,
}

impl AcceptLoop {
    async fn run(self) {
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = self.listener.accept() => match result {
                    Ok((stream, remote_addr)) => {
                        let dispatcher = Arc::clone(&self.dispatcher);
                        let shutdown = self.shutdown.clone();
                        let token = tracker.acquire();

                        tokio::spawn(async move {
                            if let Err(error) = serve_connection(dispatcher, stream, shutdown).await {
                                tracing::debug!(%remote_addr, %error, "Connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(error) => {
                        tracing::error!(%error, "Failed to accept connection");
                    }
                },

                () = self.shutdown.recv() => break,
            }
        }

        drop(self.listener);

        let drained = tokio::time::timeout(self.shutdown_timeout, tracker.drained())
            .await
            .is_ok();
        self.logger.stopped(&self.name, drained);
    }
}

async fn serve_connection(
    dispatcher: Arc<Dispatcher>,
    stream: TcpStream,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);
    let service = service_fn(move |request: Request<Incoming>| {
        let dispatcher = Arc::clone(&dispatcher);
        async move { Ok::<_, Infallible>(dispatcher.dispatch(request).await) }
    });

    let conn = http1::Builder::new().serve_connection(io, service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => result,
        () = shutdown.recv() => {
            // Finish the in-flight request, then close.
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    }
}
