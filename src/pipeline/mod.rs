pub mod stage1_lexical;
pub mod stage2_rate;
pub mod stage3_signals;
pub mod stage4_normalize;
pub mod stage5_aggregate;
pub mod stage6_report;
