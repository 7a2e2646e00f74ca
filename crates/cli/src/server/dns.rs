use ferrous_zones_infrastructure::dns::{DnsRequestHandler, MAX_UDP_PAYLOAD};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn start_dns_server(
    bind_addr: SocketAddr,
    handler: Arc<DnsRequestHandler>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let udp_socket = Arc::new(UdpSocket::from_std(create_udp_socket(bind_addr)?)?);
    let tcp_listener = create_tcp_listener(bind_addr)?;

    info!(bind_address = %bind_addr, "DNS server listening on UDP and TCP");

    let mut join_set = JoinSet::new();
    join_set.spawn(run_udp(udp_socket, handler.clone(), shutdown.clone()));
    join_set.spawn(run_tcp(tcp_listener, handler, shutdown));

    while join_set.join_next().await.is_some() {}
    info!("DNS server stopped");
    Ok(())
}

async fn run_udp(socket: Arc<UdpSocket>, handler: Arc<DnsRequestHandler>, shutdown: CancellationToken) {
    let mut recv_buf = [0u8; 4096];

    loop {
        let (len, from) = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = socket.recv_from(&mut recv_buf) => match received {
                Ok(received) => received,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(error = %e, "UDP recv error");
                    continue;
                }
            },
        };

        let query = recv_buf[..len].to_vec();
        let socket = socket.clone();
        let handler = handler.clone();
        tokio::spawn(async move {
            if let Some(response) = handler.handle_raw(&query, Some(MAX_UDP_PAYLOAD)).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    debug!(client = %from, error = %e, "UDP send failed");
                }
            }
        });
    }
}

async fn run_tcp(listener: TcpListener, handler: Arc<DnsRequestHandler>, shutdown: CancellationToken) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "TCP accept error");
                    continue;
                }
            },
        };

        let handler = handler.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_tcp_connection(stream, handler).await {
                debug!(client = %peer, error = %e, "TCP DNS connection closed");
            }
        });
    }
}

/// Serve length-prefixed DNS messages until the peer closes or goes idle.
async fn serve_tcp_connection<S>(mut stream: S, handler: Arc<DnsRequestHandler>) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let mut len_buf = [0u8; 2];
        match timeout(TCP_IDLE_TIMEOUT, stream.read_exact(&mut len_buf)).await {
            Err(_) => return Ok(()),
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Ok(Err(e)) => return Err(e),
            Ok(Ok(_)) => {}
        }

        let mut message = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        timeout(TCP_IDLE_TIMEOUT, stream.read_exact(&mut message))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "TCP read timed out"))??;

        let Some(response) = handler.handle_raw(&message, None).await else {
            continue;
        };
        let Ok(response_len) = u16::try_from(response.len()) else {
            warn!(len = response.len(), "DNS response too large for TCP framing");
            continue;
        };

        stream.write_all(&response_len.to_be_bytes()).await?;
        stream.write_all(&response).await?;
        stream.flush().await?;
    }
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<std::net::UdpSocket> {
    let socket = Socket::new(Domain::for_address(socket_addr), Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    Ok(socket.into())
}

fn create_tcp_listener(socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(socket_addr), Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
