mod notice;
mod plot;
mod topbar;
