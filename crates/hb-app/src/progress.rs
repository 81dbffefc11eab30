use hb_project::DesignMode;

/// Pipeline stages of one design computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignStage {
    Idle,
    ThermalDesign,
    Sizing,
    Aggregate,
    PumpSolve,
    DeltaTSearch,
    Balance,
    VelocityCheck,
    Done,
    Failed,
}

impl DesignStage {
    pub fn label(self) -> &'static str {
        match self {
            DesignStage::Idle => "Idle",
            DesignStage::ThermalDesign => "Thermal design",
            DesignStage::Sizing => "Pipe sizing",
            DesignStage::Aggregate => "Network aggregation",
            DesignStage::PumpSolve => "Pump operating point",
            DesignStage::DeltaTSearch => "ΔT search",
            DesignStage::Balance => "Valve balancing",
            DesignStage::VelocityCheck => "Velocity check",
            DesignStage::Done => "Done",
            DesignStage::Failed => "Failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DesignStage::Done | DesignStage::Failed)
    }

    /// Whether `next` may follow this stage.
    pub fn can_transition_to(self, next: DesignStage) -> bool {
        use DesignStage::*;
        if next == Failed {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (Idle, ThermalDesign)
                | (ThermalDesign, Sizing)
                | (Sizing, Aggregate)
                | (Aggregate, PumpSolve)
                | (Aggregate, Balance)
                | (PumpSolve, DeltaTSearch)
                | (PumpSolve, Balance)
                | (DeltaTSearch, Balance)
                | (Balance, VelocityCheck)
                | (VelocityCheck, Done)
        )
    }
}

#[derive(Debug, Clone)]
pub struct DesignProgressEvent {
    pub mode: DesignMode,
    pub stage: DesignStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl DesignProgressEvent {
    pub fn stage(
        mode: DesignMode,
        stage: DesignStage,
        elapsed_wall_s: f64,
        message: Option<String>,
    ) -> Self {
        Self {
            mode,
            stage,
            elapsed_wall_s,
            message,
        }
    }
}
