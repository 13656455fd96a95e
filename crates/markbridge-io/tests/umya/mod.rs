mod cells;
mod save;
