use super::evolution_engine::{GenerationSummary, ProgressCallback};
use crate::data::CheckpointLabel;
use log::info;
use std::sync::mpsc::Sender;

pub struct LogProgressCallback {
    total_generations: usize,
}

impl LogProgressCallback {
    pub fn new(total_generations: usize) -> Self {
        Self { total_generations }
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        info!("Generation {}/{} starting...", generation, self.total_generations);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        info!(
            "Generation {} complete. Best fitness: {:.2}, best ever: {:.2}",
            summary.generation, summary.best_fitness, summary.best_ever_fitness
        );
    }

    fn on_checkpoint(&mut self, _label: CheckpointLabel, _saved: bool) {}
}

// For forwarding progress to another thread
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete { generation: usize, best_fitness: f64, best_ever_fitness: f64 },
    Checkpoint { label: CheckpointLabel, saved: bool },
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation: summary.generation,
            best_fitness: summary.best_fitness,
            best_ever_fitness: summary.best_ever_fitness,
        });
    }

    fn on_checkpoint(&mut self, label: CheckpointLabel, saved: bool) {
        let _ = self.sender.send(ProgressMessage::Checkpoint { label, saved });
    }
}
