//! Monitor UART tasks
//!
//! TX streams periodic dual-axis reports (and pong answers) to the
//! monitor side; RX parses tracker frames and queues the commands for
//! the control tick.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{Duration, Ticker};
use embedded_io_async::{Read, Write};

use rotordrive_protocol::frame::MAX_FRAME_SIZE;
use rotordrive_protocol::messages::pong_frame;
use rotordrive_protocol::{Frame, FrameParser, TrackerCommand};

use crate::channels::{COMMAND_CHANNEL, PONG_REQUEST, REPORT};
use crate::config::MONITOR_PERIOD_MS;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

async fn send_frame(tx: &mut BufferedUartTx<'static>, frame: &Frame) {
    let mut buf = [0u8; MAX_FRAME_SIZE];
    if let Ok(len) = frame.encode(&mut buf) {
        if let Err(e) = tx.write_all(&buf[..len]).await {
            warn!("monitor write failed: {:?}", e);
        }
    }
}

/// Monitor TX task - reports and pongs
#[embassy_executor::task]
pub async fn monitor_tx_task(mut tx: BufferedUartTx<'static>) {
    info!("Monitor TX task started");

    let mut ticker = Ticker::every(Duration::from_millis(MONITOR_PERIOD_MS));

    loop {
        if PONG_REQUEST.signaled() {
            PONG_REQUEST.reset();
            send_frame(&mut tx, &pong_frame()).await;
        }

        if let Some(report) = REPORT.try_take() {
            match report.to_frame() {
                Ok(frame) => send_frame(&mut tx, &frame).await,
                Err(e) => warn!("report encoding failed: {:?}", e),
            }
        }

        ticker.next().await;
    }
}

/// Monitor RX task - parses tracker frames into commands
#[embassy_executor::task]
pub async fn monitor_rx_task(mut rx: BufferedUartRx<'static>) {
    info!("Monitor RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match TrackerCommand::from_frame(&frame) {
                            Ok(cmd) => {
                                trace!("tracker command: {:?}", cmd);
                                COMMAND_CHANNEL.send(cmd).await;
                            }
                            Err(e) => warn!("bad tracker frame: {:?}", e),
                        },
                        Ok(None) => {}
                        Err(e) => warn!("frame parse error: {:?}", e),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => warn!("UART read error: {:?}", e),
        }
    }
}
