//! Gateway transport over a local process.
//!
//! The request JSON is written to the program's stdin; the response envelope
//! is read from its stdout. The request is written and both output pipes
//! are drained on their own threads, so neither side can stall the other.
//! A program that outlives the timeout is killed.

use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde_json::Value;

use super::{AgentGateway, GatewayResponse, TransportFault, request_body};

pub struct CommandGateway {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandGateway {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

impl AgentGateway for CommandGateway {
    fn call(&self, prompt: &str, capability: &str) -> Result<GatewayResponse, TransportFault> {
        tracing::debug!(program = %self.program, capability, "calling gateway process");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TransportFault::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let body = request_body(prompt, capability).to_string();
        let stdin = child.stdin.take();
        let writer = thread::spawn(move || match stdin {
            // Dropping stdin closes the pipe so the program sees EOF.
            Some(mut stdin) => stdin.write_all(body.as_bytes()),
            None => Ok(()),
        });

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if start.elapsed() > self.timeout => {
                    reap(&mut child);
                    let _ = writer.join();
                    join(stdout);
                    join(stderr);
                    return Err(TransportFault::TimedOut {
                        secs: self.timeout.as_secs(),
                    });
                }
                Ok(None) => thread::sleep(Duration::from_millis(10)),
                Err(e) => {
                    reap(&mut child);
                    return Err(TransportFault::Io(e));
                }
            }
        };

        let written = writer.join().unwrap_or(Ok(()));
        let stdout = join(stdout);
        let stderr = join(stderr);
        if !status.success() {
            return Err(TransportFault::Exited {
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }
        written?;

        let value: Value =
            serde_json::from_slice(&stdout).map_err(|e| TransportFault::Decode(e.to_string()))?;
        Ok(GatewayResponse::from_value(&value))
    }
}

fn drain(pipe: Option<impl Read + Send + 'static>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn join(reader: JoinHandle<Vec<u8>>) -> Vec<u8> {
    reader.join().unwrap_or_default()
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
