pub mod refund_orchestrator;
