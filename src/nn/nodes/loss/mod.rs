mod nll_loss;

pub(in crate::nn) use nll_loss::NllLoss;
