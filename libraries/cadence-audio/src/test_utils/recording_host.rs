//! Host runtime double
//!
//! Decodes for real (through Symphonia) but renders nothing. Every graph call
//! is recorded so tests can assert wiring order, and the audio clock only
//! moves when the test advances it.

use crate::decoder::SymphoniaDecoder;
use crate::distortion::DistortionCurve;
use crate::error::Result;
use crate::host::{AudioHost, AudioParam, BufferHandle, BufferId, FilterKind, NodeId};
use std::collections::{HashMap, HashSet};

/// What a node is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// Source bound to a buffer
    Source(BufferId),
    /// Gain stage
    Gain,
    /// Waveshaper
    WaveShaper,
    /// Shelving filter
    Biquad(FilterKind),
    /// Convolver
    Convolver,
    /// Spectrum analyser
    Analyser {
        /// FFT size
        fft_size: usize,
    },
}

/// Connection target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Another node
    Node(NodeId),
    /// Master output
    Destination,
}

/// One recorded host call
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    /// `decode` (successful or not)
    Decode {
        /// Input length
        bytes: usize,
    },
    /// `create_buffer` or a successful `decode`
    CreateBuffer(BufferId),
    /// Any node constructor
    CreateNode(NodeId, NodeKind),
    /// `connect` / `connect_to_destination`
    Connect(NodeId, Endpoint),
    /// `disconnect`
    Disconnect(NodeId),
    /// `start_source`
    Start(NodeId, f64),
    /// `stop_source`
    Stop(NodeId),
    /// `set_param`
    SetParam(NodeId, AudioParam, f32),
    /// `set_curve`
    SetCurve(NodeId),
    /// `set_convolver_buffer`
    SetConvolverBuffer(NodeId, BufferId),
}

/// Recording host runtime
#[derive(Debug)]
pub struct RecordingHost {
    sample_rate: u32,
    clock: f64,
    next_id: u64,
    decoder: SymphoniaDecoder,
    decode_count: usize,
    nodes: HashMap<NodeId, NodeKind>,
    params: HashMap<(NodeId, AudioParam), f32>,
    edges: Vec<(NodeId, Endpoint)>,
    curves: HashMap<NodeId, DistortionCurve>,
    convolver_buffers: HashMap<NodeId, BufferId>,
    buffers: HashMap<BufferId, BufferHandle>,
    running: HashSet<NodeId>,
    spectrum: Vec<u8>,
    calls: Vec<HostCall>,
}

impl RecordingHost {
    /// Create a host running at `sample_rate` with the clock at zero
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            clock: 0.0,
            next_id: 1,
            decoder: SymphoniaDecoder::new(),
            decode_count: 0,
            nodes: HashMap::new(),
            params: HashMap::new(),
            edges: Vec::new(),
            curves: HashMap::new(),
            convolver_buffers: HashMap::new(),
            buffers: HashMap::new(),
            running: HashSet::new(),
            spectrum: Vec::new(),
            calls: Vec::new(),
        }
    }

    fn next_raw(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let node = NodeId::new(self.next_raw());
        self.nodes.insert(node, kind);
        self.calls.push(HostCall::CreateNode(node, kind));
        node
    }

    fn add_buffer(&mut self, duration: f64, sample_rate: u32, channels: u16) -> BufferHandle {
        let id = BufferId::new(self.next_raw());
        let handle = BufferHandle::new(id, duration, sample_rate, channels);
        self.buffers.insert(id, handle.clone());
        self.calls.push(HostCall::CreateBuffer(id));
        handle
    }

    /// Move the audio clock forward
    pub fn advance(&mut self, seconds: f64) {
        self.clock += seconds;
    }

    /// Set the audio clock
    pub fn set_time(&mut self, seconds: f64) {
        self.clock = seconds;
    }

    /// Bins returned by every later `frequency_data` call
    pub fn set_spectrum(&mut self, bins: Vec<u8>) {
        self.spectrum = bins;
    }

    /// Every call so far
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Forget recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of `decode` calls
    pub fn decode_count(&self) -> usize {
        self.decode_count
    }

    /// Outgoing connections of `node`, in wiring order
    pub fn connections_from(&self, node: NodeId) -> Vec<Endpoint> {
        self.edges
            .iter()
            .filter(|(from, _)| *from == node)
            .map(|(_, to)| *to)
            .collect()
    }

    /// Source nodes that currently have an outgoing connection
    pub fn connected_sources(&self) -> Vec<NodeId> {
        let mut sources: Vec<NodeId> = self
            .edges
            .iter()
            .map(|(from, _)| *from)
            .filter(|n| matches!(self.nodes.get(n), Some(NodeKind::Source(_))))
            .collect();
        sources.sort();
        sources.dedup();
        sources
    }

    /// Whether a source was started and not yet stopped
    pub fn is_running(&self, node: NodeId) -> bool {
        self.running.contains(&node)
    }

    /// Kind of a node
    pub fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.nodes.get(&node).copied()
    }

    /// Buffer a source plays
    pub fn source_buffer(&self, node: NodeId) -> Option<BufferId> {
        match self.nodes.get(&node) {
            Some(NodeKind::Source(buffer)) => Some(*buffer),
            _ => None,
        }
    }

    /// Curve installed on a waveshaper
    pub fn curve(&self, node: NodeId) -> Option<&DistortionCurve> {
        self.curves.get(&node)
    }

    /// Impulse installed on a convolver
    pub fn convolver_buffer(&self, node: NodeId) -> Option<BufferId> {
        self.convolver_buffers.get(&node).copied()
    }

    /// Look up a buffer
    pub fn buffer(&self, id: BufferId) -> Option<&BufferHandle> {
        self.buffers.get(&id)
    }

    /// Number of impulses installed on a convolver
    pub fn impulse_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::SetConvolverBuffer(..)))
            .count()
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new(44_100)
    }
}

impl AudioHost for RecordingHost {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn now(&self) -> f64 {
        self.clock
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<BufferHandle> {
        self.decode_count += 1;
        self.calls.push(HostCall::Decode { bytes: bytes.len() });
        let decoded = self.decoder.decode_bytes(bytes, None)?;
        Ok(self.add_buffer(decoded.duration(), decoded.sample_rate, decoded.channels))
    }

    fn create_buffer(&mut self, channels: &[Vec<f32>], sample_rate: u32) -> BufferHandle {
        let frames = channels.first().map_or(0, Vec::len);
        let duration = if sample_rate == 0 {
            0.0
        } else {
            frames as f64 / f64::from(sample_rate)
        };
        self.add_buffer(duration, sample_rate, channels.len() as u16)
    }

    fn create_source(&mut self, buffer: &BufferHandle) -> NodeId {
        let node = self.add_node(NodeKind::Source(buffer.id()));
        self.params.insert((node, AudioParam::PlaybackRate), 1.0);
        node
    }

    fn create_gain(&mut self) -> NodeId {
        let node = self.add_node(NodeKind::Gain);
        self.params.insert((node, AudioParam::Gain), 1.0);
        node
    }

    fn create_wave_shaper(&mut self) -> NodeId {
        self.add_node(NodeKind::WaveShaper)
    }

    fn create_biquad(&mut self, kind: FilterKind) -> NodeId {
        let node = self.add_node(NodeKind::Biquad(kind));
        self.params.insert((node, AudioParam::Gain), 0.0);
        self.params.insert((node, AudioParam::Frequency), 350.0);
        node
    }

    fn create_convolver(&mut self) -> NodeId {
        self.add_node(NodeKind::Convolver)
    }

    fn create_analyser(&mut self, fft_size: usize) -> NodeId {
        self.add_node(NodeKind::Analyser { fft_size })
    }

    fn connect(&mut self, from: NodeId, to: NodeId) {
        self.edges.push((from, Endpoint::Node(to)));
        self.calls.push(HostCall::Connect(from, Endpoint::Node(to)));
    }

    fn connect_to_destination(&mut self, from: NodeId) {
        self.edges.push((from, Endpoint::Destination));
        self.calls.push(HostCall::Connect(from, Endpoint::Destination));
    }

    fn disconnect(&mut self, node: NodeId) {
        self.edges.retain(|(from, _)| *from != node);
        self.calls.push(HostCall::Disconnect(node));
    }

    fn start_source(&mut self, node: NodeId, offset: f64) {
        self.running.insert(node);
        self.calls.push(HostCall::Start(node, offset));
    }

    fn stop_source(&mut self, node: NodeId) {
        self.running.remove(&node);
        self.calls.push(HostCall::Stop(node));
    }

    fn set_param(&mut self, node: NodeId, param: AudioParam, value: f32) {
        self.params.insert((node, param), value);
        self.calls.push(HostCall::SetParam(node, param, value));
    }

    fn param(&self, node: NodeId, param: AudioParam) -> Option<f32> {
        self.params.get(&(node, param)).copied()
    }

    fn set_curve(&mut self, node: NodeId, curve: &DistortionCurve) {
        self.curves.insert(node, curve.clone());
        self.calls.push(HostCall::SetCurve(node));
    }

    fn set_convolver_buffer(&mut self, node: NodeId, buffer: &BufferHandle) {
        self.convolver_buffers.insert(node, buffer.id());
        self.calls.push(HostCall::SetConvolverBuffer(node, buffer.id()));
    }

    fn frequency_data(&self, _node: NodeId, out: &mut [u8]) {
        out.fill(0);
        for (dst, src) in out.iter_mut().zip(&self.spectrum) {
            *dst = *src;
        }
    }
}
