pub mod road;
pub mod sim;
pub mod topo;
pub mod traffic;
pub mod viz;

#[cfg(test)]
mod test;
